use clap::Parser;
use customs_office_resolver::app::confirmation::{delivery_destination, format_brl, PageParams};
use customs_office_resolver::app::upsell::CheckoutRequest;
use customs_office_resolver::utils::error::ErrorSeverity;
use customs_office_resolver::utils::{logger, validation::Validate};
use customs_office_resolver::{
    CliConfig, OfficeRecord, OutputFormat, ResolutionOutcome, ResolverError, TomlConfig, TrackingCode,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report {
    tracking: String,
    office: OfficeRecord,
    fallback: Option<String>,
    express_paid: bool,
    amount: Option<String>,
    upsell: Option<CheckoutRequest>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting customs-office-resolver");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    if let Some(state) = &cli.state {
        let dataset = config.load_dataset().unwrap_or_else(|e| exit_with(e));
        let office = dataset.nearest(state).clone();
        print_office(&office, cli.format)?;
        return Ok(());
    }

    let params = match (&cli.query, &cli.tracking) {
        (Some(query), _) => PageParams::from_query(query),
        (None, tracking) => PageParams {
            tracking: TrackingCode::from_optional(tracking.as_deref()),
            ..PageParams::default()
        },
    };

    let resolver = config.build_resolver().unwrap_or_else(|e| exit_with(e));
    let upsell = config.build_upsell().unwrap_or_else(|e| exit_with(e));

    // 同一筆客戶資料決定海關與加購；查不到時只是不顯示加購
    let (resolution, lead) = resolver.resolve_with_lead(&params.tracking).await;
    let express_paid = params.express_paid();

    let upsell_request = match (&lead, express_paid) {
        (Some(lead), false) => Some(upsell.checkout_request(lead, &params.tracking, upsell.pick_amount())),
        _ => None,
    };

    let report = Report {
        tracking: params.tracking.to_string(),
        fallback: match &resolution.outcome {
            ResolutionOutcome::Fallback { reason } => Some(reason.to_string()),
            ResolutionOutcome::Matched { .. } => None,
        },
        office: resolution.office,
        express_paid,
        amount: params.formatted_amount(),
        upsell: upsell_request,
    };

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if !report.tracking.is_empty() {
                println!("Código de rastreio: {}", report.tracking);
            }
            if let Some(amount) = &report.amount {
                println!("Valor pago: {}", amount);
            }
            print_office(&report.office, OutputFormat::Text)?;
            if report.express_paid {
                println!("Entrega expressa: paga");
            } else if let Some(request) = &report.upsell {
                println!(
                    "Entrega expressa para {}: {}",
                    delivery_destination(lead.as_ref()),
                    format_brl(f64::from(request.amount))
                );
            }
        }
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> customs_office_resolver::Result<TomlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };

    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn print_office(office: &OfficeRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(office)?),
        OutputFormat::Text => {
            println!("{}", office.name);
            println!("Telefone: {}", office.phone);
            println!("{}", office.address);
        }
    }
    Ok(())
}

fn exit_with(e: ResolverError) -> ! {
    tracing::error!(
        "Failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

use anyhow::Result;
use customs_office_resolver::adapters::InMemoryLeadStore;
use customs_office_resolver::app::confirmation::{delivery_destination, PageParams};
use customs_office_resolver::app::upsell::ExpressUpsell;
use customs_office_resolver::{
    Lead, LeadStateHint, OfficeDataset, OfficeResolver, OfficeSlot, DEFAULT_STATE_CODE,
};

fn store() -> InMemoryLeadStore {
    InMemoryLeadStore::from_leads(vec![Lead {
        tracking: "BR321".to_string(),
        name: "Fernanda Ribeiro".to_string(),
        email: "fernanda@example.com".to_string(),
        telephone: "81966665555".to_string(),
        cpf: "86288366757".to_string(),
        city: Some("olinda".to_string()),
        state: Some("PE".to_string()),
        created_at: None,
    }])
}

/// 付款成功頁：解析參數、決定海關、建立加購請求
#[tokio::test]
async fn test_confirmation_page_flow() -> Result<()> {
    let params = PageParams::from_query("?tracking=BR321&amount=26.71");
    let resolver = OfficeResolver::new(OfficeDataset::builtin(), LeadStateHint::new(store()));

    let slot = OfficeSlot::new();
    let ticket = slot.begin();
    let (resolution, lead) = resolver.resolve_with_lead(&params.tracking).await;
    assert!(slot.apply(ticket, resolution.office));
    assert_eq!(slot.current().unwrap().state.as_str(), "PE");

    assert!(!params.express_paid());
    assert_eq!(params.formatted_amount().as_deref(), Some("R$ 26.71"));

    let lead = lead.expect("lead should exist");
    assert_eq!(delivery_destination(Some(&lead)), "Olinda, PE");

    let upsell = ExpressUpsell::new(&[12, 15])?;
    let amount = upsell.pick_amount();
    let request = upsell.checkout_request(&lead, &params.tracking, amount);
    assert_eq!(request.tracking_code, "BR321-EXPRESS");
    assert!(request.amount == 12 || request.amount == 15);
    Ok(())
}

/// 加購付款完成後回到頁面，追蹤碼帶 -EXPRESS
#[tokio::test]
async fn test_express_return_page() {
    let params = PageParams::from_query("tracking=BR321-EXPRESS");
    let resolver = OfficeResolver::new(OfficeDataset::builtin(), LeadStateHint::new(store()));

    assert!(params.express_paid());
    let office = resolver.resolve_office_for_tracking(params.tracking).await;
    assert_eq!(office.state.as_str(), "PE");
}

/// 較晚開始的解析結果優先，舊結果到達時被丟棄
#[tokio::test]
async fn test_newer_resolution_supersedes_stale_one() {
    let resolver = OfficeResolver::new(OfficeDataset::builtin(), LeadStateHint::new(store()));
    let slot = OfficeSlot::new();

    let stale_ticket = slot.begin();
    let fresh_ticket = slot.begin();

    let fresh = resolver.resolve_office_for_tracking("BR321").await;
    let stale = resolver.resolve_office_for_tracking("").await;

    assert!(slot.apply(fresh_ticket, fresh));
    assert!(!slot.apply(stale_ticket, stale));
    assert_eq!(slot.current().unwrap().state.as_str(), "PE");
    assert_ne!(slot.current().unwrap().state.as_str(), DEFAULT_STATE_CODE);
}

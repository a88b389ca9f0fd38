pub mod confirmation;
pub mod upsell;

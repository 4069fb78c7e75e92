pub mod assumptions;
pub mod proforma;
pub mod scenarios;

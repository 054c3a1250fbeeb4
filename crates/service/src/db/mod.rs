//! CRUD service functions over the entities. Plain reads/writes only;
//! balance-bearing fields of `client_services` are owned by the ledger.

pub mod client_services;
pub mod clients;
pub mod payments;
pub mod services;

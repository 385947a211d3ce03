pub mod order_event_repo;
pub mod order_repo;
pub mod payment_account_repo;
pub mod product_repo;

pub use order_event_repo::OrderEventRepo;
pub use order_repo::{OrderRepo, OrderWriteError};
pub use payment_account_repo::PaymentAccountRepo;
pub use product_repo::ProductRepo;

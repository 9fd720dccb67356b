pub mod series_repo;
pub use series_repo::SeriesRepository;
pub mod reference_repo;
pub use reference_repo::ReferenceRepository;
pub mod team_repo;
pub use team_repo::TeamRepository;
pub mod rfq_repo;
pub use rfq_repo::RfqRepository;
pub mod quotation_repo;
pub use quotation_repo::QuotationRepository;
pub mod purchase_order_repo;
pub use purchase_order_repo::PurchaseOrderRepository;
pub mod work_order_repo;
pub use work_order_repo::WorkOrderRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

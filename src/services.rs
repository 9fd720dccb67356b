pub mod auth;
pub mod file_store;
pub mod notification;
pub mod numbering;
pub mod purchase_order_service;
pub mod quotation_service;
pub mod reference_service;
pub mod rfq_service;
pub mod series_service;
pub mod team_service;
pub mod work_order_service;

pub mod auth;
pub mod filters;
pub mod line_item;
pub mod purchase_order;
pub mod quotation;
pub mod reference;
pub mod rfq;
pub mod series;
pub mod team;
pub mod work_order;

//! Service category management: the catalogue of services the studio offers.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;

pub use core::{
    CategoryService, CategoryServiceForm, CategoryServiceId, ValidCategoryService,
    category_service_exists,
    count_category_services, create_category_service, create_category_service_table,
    get_category_service, list_category_service_names,
};
pub use create_endpoint::{create_category_service_endpoint, get_new_category_service_page};
pub use delete_endpoint::delete_category_service_endpoint;
pub use edit_endpoint::{get_edit_category_service_page, update_category_service_endpoint};
pub use list::get_category_services_page;

//! Customer roster management.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;

pub use core::{
    Customer, CustomerForm, CustomerId, ValidCustomer, count_customers, create_customer,
    create_customer_table, customer_exists, get_customer, list_customer_names,
};
pub use create_endpoint::{create_customer_endpoint, get_new_customer_page};
pub use delete_endpoint::delete_customer_endpoint;
pub use edit_endpoint::{get_edit_customer_page, update_customer_endpoint};
pub use list::get_customers_page;

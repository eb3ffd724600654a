//! Employee (worker) roster management.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;

pub use core::{
    Employee, EmployeeForm, EmployeeId, ValidEmployee, count_employees, create_employee,
    create_employee_table, employee_exists, get_employee, list_employee_names,
};
pub use create_endpoint::{create_employee_endpoint, get_new_employee_page};
pub use delete_endpoint::delete_employee_endpoint;
pub use edit_endpoint::{get_edit_employee_page, update_employee_endpoint};
pub use list::get_employees_page;

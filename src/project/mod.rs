//! Portfolio project management: published and draft work samples, each
//! belonging to a service category.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;

pub use core::{
    Project, ProjectForm, ProjectId, count_projects, create_project, create_project_table,
    get_project,
};
pub use create_endpoint::{create_project_endpoint, get_new_project_page};
pub use delete_endpoint::delete_project_endpoint;
pub use edit_endpoint::{get_edit_project_page, update_project_endpoint};
pub use list::get_projects_page;

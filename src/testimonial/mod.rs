//! Customer testimonial management.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;

pub use core::{
    Testimonial, TestimonialForm, TestimonialId, count_testimonials, create_testimonial,
    create_testimonial_table, get_testimonial,
};
pub use create_endpoint::{create_testimonial_endpoint, get_new_testimonial_page};
pub use delete_endpoint::delete_testimonial_endpoint;
pub use edit_endpoint::{get_edit_testimonial_page, update_testimonial_endpoint};
pub use list::get_testimonials_page;

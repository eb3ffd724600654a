//! The service category model, validation and database operations.

use std::collections::HashMap;

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    forms::{FieldErrors, FormValue, optional_text, require_price, require_text, take_file, take_text},
    storage::{UploadedFile, check_upload},
};

/// The row id of a service category.
pub type CategoryServiceId = i64;

/// How many service categories to show per page.
pub const CATEGORY_SERVICES_PER_PAGE: u64 = 10;

/// The accepted image formats for a category's display image.
pub(crate) const CATEGORY_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "png", "jpg", "gif"];

/// A category of service the studio sells, with a starting price and a
/// display image.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryService {
    /// The id of the category.
    pub id: CategoryServiceId,
    /// The category name. Unique across all categories.
    pub name: String,
    /// An optional longer description.
    pub description: Option<String>,
    /// The starting price in whole rupiah.
    pub start_from: i64,
    /// The bucket-relative path of the stored display image.
    pub image: String,
    /// When the category was created.
    pub created_at: OffsetDateTime,
}

/// The multipart form data for creating or updating a service category.
#[derive(Debug, Clone)]
pub struct CategoryServiceForm {
    /// The category name.
    pub name: String,
    /// An optional longer description.
    pub description: String,
    /// The starting price as submitted.
    pub start_from: String,
    /// The uploaded display image, if one was selected.
    pub image: Option<UploadedFile>,
}

/// A category form that has passed validation, minus the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCategoryService {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) start_from: i64,
}

impl CategoryServiceForm {
    /// Pull the category fields out of a parsed multipart form.
    pub fn from_multipart(fields: &mut HashMap<String, FormValue>) -> Self {
        Self {
            name: take_text(fields, "name"),
            description: take_text(fields, "description"),
            start_from: take_text(fields, "start_from"),
            image: take_file(fields, "image"),
        }
    }

    /// Validate for creation. The image is required.
    pub fn validate_new(&self) -> Result<(ValidCategoryService, &UploadedFile), FieldErrors> {
        let mut errors = FieldErrors::new();

        let category = self.validate_fields(&mut errors);

        let image = match &self.image {
            Some(image) => {
                check_upload(&mut errors, "image", image, CATEGORY_IMAGE_EXTENSIONS);
                Some(image)
            }
            None => {
                errors.push("image", "the image field is required");
                None
            }
        };

        match (category, image) {
            (Some(category), Some(image)) if errors.is_empty() => Ok((category, image)),
            _ => Err(errors),
        }
    }

    /// Validate for update. A missing image means "keep the stored one".
    pub fn validate_update(
        &self,
    ) -> Result<(ValidCategoryService, Option<&UploadedFile>), FieldErrors> {
        let mut errors = FieldErrors::new();

        let category = self.validate_fields(&mut errors);

        if let Some(image) = &self.image {
            check_upload(&mut errors, "image", image, CATEGORY_IMAGE_EXTENSIONS);
        }

        match category {
            Some(category) if errors.is_empty() => Ok((category, self.image.as_ref())),
            _ => Err(errors),
        }
    }

    fn validate_fields(&self, errors: &mut FieldErrors) -> Option<ValidCategoryService> {
        let name = require_text(errors, "name", &self.name, 255);
        let description =
            optional_text(errors, "description", &self.description, 65535).filter(|d| !d.is_empty());
        let start_from = require_price(errors, "start_from", &self.start_from);

        match (name, start_from) {
            (Some(name), Some(start_from)) => Some(ValidCategoryService {
                name,
                description,
                start_from,
            }),
            _ => None,
        }
    }
}

/// Initialize the service category table.
pub fn create_category_service_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category_service (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            start_from INTEGER NOT NULL,
            image TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_row_to_category_service(row: &Row) -> Result<CategoryService, rusqlite::Error> {
    Ok(CategoryService {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start_from: row.get(3)?,
        image: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Create a service category and return it with its generated id.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if the name is already in use.
pub fn create_category_service(
    category: ValidCategoryService,
    image_path: &str,
    connection: &Connection,
) -> Result<CategoryService, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category_service (name, description, start_from, image, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &category.name,
            &category.description,
            category.start_from,
            image_path,
            created_at,
        ),
    )?;

    Ok(CategoryService {
        id: connection.last_insert_rowid(),
        name: category.name,
        description: category.description,
        start_from: category.start_from,
        image: image_path.to_owned(),
        created_at,
    })
}

/// Retrieve a single service category by id.
pub fn get_category_service(
    id: CategoryServiceId,
    connection: &Connection,
) -> Result<CategoryService, Error> {
    connection
        .prepare(
            "SELECT id, name, description, start_from, image, created_at
            FROM category_service WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_category_service)
        .map_err(|error| error.into())
}

/// Whether a service category with `id` exists.
pub fn category_service_exists(
    id: CategoryServiceId,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection.query_one(
        "SELECT COUNT(1) FROM category_service WHERE id = ?1",
        [id],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// All category ids and names, ordered by name, for selection lists.
pub fn list_category_service_names(
    connection: &Connection,
) -> Result<Vec<(CategoryServiceId, String)>, Error> {
    connection
        .prepare("SELECT id, name FROM category_service ORDER BY name")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

/// The total number of service categories.
pub fn count_category_services(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM category_service", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of service categories, newest first.
pub fn get_category_services_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<CategoryService>, Error> {
    connection
        .prepare(
            "SELECT id, name, description, start_from, image, created_at FROM category_service
            ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], map_row_to_category_service)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a category's fields. When `image_path` is `None` the stored
/// image path is kept.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if another category has the name,
/// or [Error::UpdateMissingCategoryService] if the category doesn't exist.
pub fn update_category_service(
    id: CategoryServiceId,
    category: ValidCategoryService,
    image_path: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = match image_path {
        Some(image_path) => connection.execute(
            "UPDATE category_service
            SET name = ?1, description = ?2, start_from = ?3, image = ?4 WHERE id = ?5",
            (
                &category.name,
                &category.description,
                category.start_from,
                image_path,
                id,
            ),
        )?,
        None => connection.execute(
            "UPDATE category_service
            SET name = ?1, description = ?2, start_from = ?3 WHERE id = ?4",
            (
                &category.name,
                &category.description,
                category.start_from,
                id,
            ),
        )?,
    };

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategoryService);
    }

    Ok(())
}

/// Delete a service category by id. Returns an error if it doesn't exist.
pub fn delete_category_service(
    id: CategoryServiceId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category_service WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategoryService);
    }

    Ok(())
}


#[cfg(test)]
mod category_service_query_tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{
        ValidCategoryService, category_service_exists, count_category_services,
        create_category_service, create_category_service_table, delete_category_service,
        get_category_service, get_category_services_page, update_category_service,
    };

    fn get_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_service_table(&connection)
            .expect("Could not create category service table");

        connection
    }

    fn valid_category(name: &str) -> ValidCategoryService {
        ValidCategoryService {
            name: name.to_owned(),
            description: None,
            start_from: 500_000,
        }
    }

    #[test]
    fn create_and_get_category() {
        let connection = get_test_connection();

        let created = create_category_service(
            valid_category("Logo Design"),
            "category_services/abc.jpg",
            &connection,
        )
        .expect("Could not create category");
        let got = get_category_service(created.id, &connection).expect("Could not get category");

        assert_eq!(created, got);
        assert_eq!(got.image, "category_services/abc.jpg");
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let connection = get_test_connection();
        create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();

        let result = create_category_service(valid_category("Logo Design"), "b.jpg", &connection);

        assert_eq!(result, Err(Error::DuplicateCategoryName));
    }

    #[test]
    fn exists_reflects_catalogue() {
        let connection = get_test_connection();
        let created =
            create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();

        assert!(category_service_exists(created.id, &connection).unwrap());
        assert!(!category_service_exists(created.id + 1, &connection).unwrap());
    }

    #[test]
    fn pagination_counts_and_windows() {
        let connection = get_test_connection();
        for n in 0..11 {
            create_category_service(valid_category(&format!("Category {n}")), "a.jpg", &connection)
                .unwrap();
        }

        assert_eq!(count_category_services(&connection).unwrap(), 11);

        let page = get_category_services_page(10, 10, &connection).expect("Could not get page");
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn update_without_image_keeps_stored_path() {
        let connection = get_test_connection();
        let created =
            create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();

        update_category_service(created.id, valid_category("Logo & Branding"), None, &connection)
            .expect("Could not update category");

        let got = get_category_service(created.id, &connection).unwrap();
        assert_eq!(got.name, "Logo & Branding");
        assert_eq!(got.image, "a.jpg");
    }

    #[test]
    fn update_with_image_replaces_stored_path() {
        let connection = get_test_connection();
        let created =
            create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();

        update_category_service(
            created.id,
            valid_category("Logo Design"),
            Some("b.jpg"),
            &connection,
        )
        .expect("Could not update category");

        let got = get_category_service(created.id, &connection).unwrap();
        assert_eq!(got.image, "b.jpg");
    }

    #[test]
    fn update_keeps_own_name() {
        let connection = get_test_connection();
        let created =
            create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();

        update_category_service(created.id, valid_category("Logo Design"), None, &connection)
            .expect("Re-submitting the same name for the same row should not fail");
    }

    #[test]
    fn update_rejects_another_categorys_name() {
        let connection = get_test_connection();
        create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();
        let second =
            create_category_service(valid_category("Web Design"), "b.jpg", &connection).unwrap();

        let result =
            update_category_service(second.id, valid_category("Logo Design"), None, &connection);

        assert_eq!(result, Err(Error::DuplicateCategoryName));
    }

    #[test]
    fn delete_removes_category() {
        let connection = get_test_connection();
        let created =
            create_category_service(valid_category("Logo Design"), "a.jpg", &connection).unwrap();

        delete_category_service(created.id, &connection).expect("Could not delete category");

        assert_eq!(
            get_category_service(created.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_category_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_category_service(42, &connection),
            Err(Error::DeleteMissingCategoryService)
        );
    }
}

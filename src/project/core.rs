//! The portfolio project model, validation and database operations.

use std::collections::HashMap;

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category_service::CategoryServiceId,
    forms::{
        FieldErrors, FormValue, require_price, require_reference, require_text, take_file,
        take_text,
    },
    storage::{UploadedFile, check_upload},
};

/// The row id of a project.
pub type ProjectId = i64;

/// How many projects to show per page.
pub const PROJECTS_PER_PAGE: u64 = 6;

/// The accepted image formats for a project's poster.
pub(crate) const POSTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A portfolio entry: a piece of work done for a client, shown on the public
/// site when published.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// The id of the project.
    pub id: ProjectId,
    /// The project title.
    pub title: String,
    /// What was built and for whom.
    pub description: String,
    /// The bucket-relative path of the stored poster image, if one was
    /// uploaded.
    pub poster: Option<String>,
    /// Whether the project is visible on the public site.
    pub is_published: bool,
    /// The project price in whole rupiah.
    pub price: i64,
    /// Comma-joined language/technology tags, e.g. "Rust,TypeScript".
    pub languages: String,
    /// The service category this project belongs to.
    pub category_service_id: CategoryServiceId,
    /// When the project was created.
    pub created_at: OffsetDateTime,
}

/// A project row joined with the name of its service category, for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectListing {
    /// The project itself.
    pub project: Project,
    /// The name of the referenced service category.
    pub category_name: String,
}

/// The multipart form data for creating or updating a project.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    /// The project title.
    pub title: String,
    /// What was built and for whom.
    pub description: String,
    /// The published checkbox value as submitted.
    pub is_published: String,
    /// The price as submitted.
    pub price: String,
    /// Comma-joined language tags.
    pub languages: String,
    /// The selected service category id as submitted.
    pub category_service_id: String,
    /// The uploaded poster, if one was selected.
    pub poster: Option<UploadedFile>,
}

/// A project form that has passed validation, minus the poster.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProject {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) is_published: bool,
    pub(crate) price: i64,
    pub(crate) languages: String,
    pub(crate) category_service_id: CategoryServiceId,
}

impl ProjectForm {
    /// Pull the project fields out of a parsed multipart form.
    pub fn from_multipart(fields: &mut HashMap<String, FormValue>) -> Self {
        Self {
            title: take_text(fields, "title"),
            description: take_text(fields, "description"),
            is_published: take_text(fields, "is_published"),
            price: take_text(fields, "price"),
            languages: take_text(fields, "languages"),
            category_service_id: take_text(fields, "category_service_id"),
            poster: take_file(fields, "poster"),
        }
    }

    /// Validate the form. The poster is optional for both creation and
    /// update; an absent checkbox means "not published".
    ///
    /// Whether the referenced category actually exists is checked separately
    /// by the endpoints, which have database access.
    pub fn validate(&self) -> Result<(ValidProject, Option<&UploadedFile>), FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = require_text(&mut errors, "title", &self.title, 255);
        let description = require_text(&mut errors, "description", &self.description, 65535);
        let price = require_price(&mut errors, "price", &self.price);
        let languages = require_text(&mut errors, "languages", &self.languages, 255);
        let category_service_id =
            require_reference(&mut errors, "category_service_id", &self.category_service_id);
        let is_published = matches!(self.is_published.trim(), "true" | "on" | "1");

        if let Some(poster) = &self.poster {
            check_upload(&mut errors, "poster", poster, POSTER_EXTENSIONS);
        }

        match (title, description, price, languages, category_service_id) {
            (Some(title), Some(description), Some(price), Some(languages), Some(category_id))
                if errors.is_empty() =>
            {
                Ok((
                    ValidProject {
                        title,
                        description,
                        is_published,
                        price,
                        languages,
                        category_service_id: category_id,
                    },
                    self.poster.as_ref(),
                ))
            }
            _ => Err(errors),
        }
    }
}

/// Initialize the project table.
pub fn create_project_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS project (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            poster TEXT,
            is_published INTEGER NOT NULL,
            price INTEGER NOT NULL,
            languages TEXT NOT NULL,
            category_service_id INTEGER NOT NULL REFERENCES category_service(id),
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_project(row: &Row) -> Result<Project, rusqlite::Error> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        poster: row.get(3)?,
        is_published: row.get(4)?,
        price: row.get(5)?,
        languages: row.get(6)?,
        category_service_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Create a project and return it with its generated id.
///
/// # Errors
/// Returns [Error::InvalidForeignKey] if the referenced category does not
/// exist.
pub fn create_project(
    project: ValidProject,
    poster_path: Option<&str>,
    connection: &Connection,
) -> Result<Project, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO project
        (title, description, poster, is_published, price, languages, category_service_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            &project.title,
            &project.description,
            poster_path,
            project.is_published,
            project.price,
            &project.languages,
            project.category_service_id,
            created_at,
        ),
    )?;

    Ok(Project {
        id: connection.last_insert_rowid(),
        title: project.title,
        description: project.description,
        poster: poster_path.map(str::to_owned),
        is_published: project.is_published,
        price: project.price,
        languages: project.languages,
        category_service_id: project.category_service_id,
        created_at,
    })
}

/// Retrieve a single project by id.
pub fn get_project(id: ProjectId, connection: &Connection) -> Result<Project, Error> {
    connection
        .prepare(
            "SELECT id, title, description, poster, is_published, price, languages,
            category_service_id, created_at FROM project WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_project)
        .map_err(|error| error.into())
}

/// The total number of projects.
pub fn count_projects(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM project", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of projects joined with their category names, newest
/// first.
pub fn get_projects_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<ProjectListing>, Error> {
    connection
        .prepare(
            "SELECT p.id, p.title, p.description, p.poster, p.is_published, p.price, p.languages,
            p.category_service_id, p.created_at, c.name
            FROM project p JOIN category_service c ON c.id = p.category_service_id
            ORDER BY p.created_at DESC, p.id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], |row| {
            Ok(ProjectListing {
                project: map_row_to_project(row)?,
                category_name: row.get(9)?,
            })
        })?
        .map(|maybe_listing| maybe_listing.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a project's fields. When `poster_path` is `None` the stored
/// poster path is kept.
///
/// # Errors
/// Returns [Error::UpdateMissingProject] if the project doesn't exist, or
/// [Error::InvalidForeignKey] if the new category does not exist.
pub fn update_project(
    id: ProjectId,
    project: ValidProject,
    poster_path: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = match poster_path {
        Some(poster_path) => connection.execute(
            "UPDATE project SET title = ?1, description = ?2, poster = ?3, is_published = ?4,
            price = ?5, languages = ?6, category_service_id = ?7 WHERE id = ?8",
            (
                &project.title,
                &project.description,
                poster_path,
                project.is_published,
                project.price,
                &project.languages,
                project.category_service_id,
                id,
            ),
        )?,
        None => connection.execute(
            "UPDATE project SET title = ?1, description = ?2, is_published = ?3,
            price = ?4, languages = ?5, category_service_id = ?6 WHERE id = ?7",
            (
                &project.title,
                &project.description,
                project.is_published,
                project.price,
                &project.languages,
                project.category_service_id,
                id,
            ),
        )?,
    };

    if rows_affected == 0 {
        return Err(Error::UpdateMissingProject);
    }

    Ok(())
}

/// Delete a project by id. Returns an error if it doesn't exist.
pub fn delete_project(id: ProjectId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM project WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingProject);
    }

    Ok(())
}

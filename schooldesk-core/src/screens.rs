//! Entity screens of the dashboard.
//!
//! Each screen is a thin configuration of the reusable grid: which endpoint
//! lists it, how that endpoint is called, which columns and row actions it
//! shows and which filters it exposes.

use schooldesk_model::{RowIdField, filter_keys as keys};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::grid::{
    ColumnDef, CustomAction, RequestMode, RowActions, columns::value_text,
};
use crate::rbac::entities;
use schooldesk_model::Action;

#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Stable key used on the command line, e.g. `students`.
    pub key: String,
    pub title: String,
    /// Entity name checked by the permission resolver.
    pub entity_name: String,
    pub list_path: String,
    /// Base of `DELETE <delete_path>/<accountId>/<id>`.
    pub delete_path: Option<String>,
    pub request_mode: RequestMode,
    pub columns: Vec<ColumnDef>,
    pub actions: RowActions,
    pub filter_keys: Vec<String>,
    pub row_id_field: RowIdField,
}

impl ScreenConfig {
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        entity_name: impl Into<String>,
        list_path: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            entity_name: entity_name.into(),
            list_path: list_path.into(),
            delete_path: None,
            request_mode: RequestMode::default(),
            columns: Vec::new(),
            actions: RowActions::none(),
            filter_keys: Vec::new(),
            row_id_field: RowIdField::default(),
        }
    }

    pub fn delete_path(mut self, path: impl Into<String>) -> Self {
        self.delete_path = Some(path.into());
        self
    }

    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.request_mode = mode;
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn actions(mut self, actions: RowActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn filters<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn row_id(mut self, field: impl Into<String>) -> Self {
        self.row_id_field = RowIdField::new(field);
        self
    }

    /// SCD filters plus any extras.
    fn scd_filters(self, extra: &[&str]) -> Self {
        let keys = keys::SCD.iter().chain(extra.iter()).copied();
        self.filters(keys)
    }

    /// `DELETE` path for one row, scoped by account.
    pub fn delete_url(&self, account: impl std::fmt::Display, id: impl std::fmt::Display) -> Result<String> {
        let base = self
            .delete_path
            .as_deref()
            .ok_or_else(|| CoreError::DeleteNotSupported(self.key.clone()))?;
        Ok(format!("{}/{}/{}", base.trim_end_matches('/'), account, id))
    }
}

/// All screens, addressable by key.
#[derive(Debug, Clone)]
pub struct ScreenCatalog {
    screens: Vec<ScreenConfig>,
}

impl ScreenCatalog {
    pub fn new(screens: Vec<ScreenConfig>) -> Self {
        Self { screens }
    }

    pub fn get(&self, key: &str) -> Result<&ScreenConfig> {
        let wanted = key.trim();
        self.screens
            .iter()
            .find(|screen| screen.key.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownScreen(wanted.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenConfig> {
        self.screens.iter()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// The dashboard's standard screen set.
    pub fn standard() -> Self {
        Self::new(vec![
            students(),
            teachers(),
            classes(),
            divisions(),
            schools(),
            exams(),
            attendance(),
            assignments(),
            quizzes(),
            timetables(),
            fee_structures(),
            roles(),
            documents(),
        ])
    }
}

fn full_name(row: &Value) -> std::result::Result<Value, crate::grid::CellError> {
    let first = row.get("firstName").map(value_text).unwrap_or_default();
    let last = row.get("lastName").map(value_text).unwrap_or_default();
    let name = format!("{first} {last}").trim().to_string();
    if name.is_empty() {
        return Err(crate::grid::CellError("no name fields".into()));
    }
    Ok(Value::String(name))
}

fn scd_columns(screen: ScreenConfig) -> ScreenConfig {
    screen
        .column(ColumnDef::new(keys::SCHOOL_ID, "School").flex(1.0))
        .column(ColumnDef::new(keys::CLASS_ID, "Class").width(100))
        .column(ColumnDef::new(keys::DIVISION_ID, "Division").width(100))
}

fn students() -> ScreenConfig {
    let screen = ScreenConfig::new("students", "Students", entities::STUDENT, "students/search")
        .delete_path("students")
        .column(ColumnDef::new("name", "Name").flex(1.5).value_getter(full_name))
        .column(ColumnDef::new("rollNumber", "Roll No.").width(90));
    scd_columns(screen)
        .column(ColumnDef::new("email", "Email").flex(1.0))
        .actions(RowActions::crud().with_enroll())
        .scd_filters(&[])
}

fn teachers() -> ScreenConfig {
    ScreenConfig::new("teachers", "Teachers", entities::TEACHER, "teachers/search")
        .delete_path("teachers")
        .column(ColumnDef::new("name", "Name").flex(1.5).value_getter(full_name))
        .column(ColumnDef::new("email", "Email").flex(1.0))
        .column(ColumnDef::new("phone", "Phone").width(120))
        .column(ColumnDef::new(keys::SCHOOL_ID, "School").flex(1.0))
        .actions(
            RowActions::crud()
                .with_custom(CustomAction::new("allocate", "Allocate classes").requires(Action::Edit)),
        )
        .filters([keys::SCHOOL_ID])
}

fn classes() -> ScreenConfig {
    ScreenConfig::new("classes", "Classes", entities::CLASS, "classes/search")
        .delete_path("classes")
        .column(ColumnDef::new("name", "Class").flex(1.0))
        .column(ColumnDef::new(keys::SCHOOL_ID, "School").flex(1.0))
        .column(ColumnDef::new("divisionCount", "Divisions").width(90))
        .actions(RowActions::crud())
        .filters([keys::SCHOOL_ID])
}

fn divisions() -> ScreenConfig {
    ScreenConfig::new("divisions", "Divisions", entities::DIVISION, "divisions/search")
        .delete_path("divisions")
        .column(ColumnDef::new("name", "Division").flex(1.0))
        .column(ColumnDef::new(keys::SCHOOL_ID, "School").flex(1.0))
        .column(ColumnDef::new(keys::CLASS_ID, "Class").width(100))
        .actions(RowActions::crud())
        .filters([keys::SCHOOL_ID, keys::CLASS_ID])
}

fn schools() -> ScreenConfig {
    ScreenConfig::new("schools", "Schools", entities::SCHOOL, "schools/search")
        .delete_path("schools")
        .column(ColumnDef::new("name", "School").flex(1.5))
        .column(ColumnDef::new("city", "City").flex(1.0))
        .column(ColumnDef::new("contactNumber", "Contact").width(130))
        .actions(RowActions::crud())
}

fn exams() -> ScreenConfig {
    let screen = ScreenConfig::new("exams", "Exams", entities::EXAM, "exams/search")
        .delete_path("exams")
        .column(ColumnDef::new("title", "Exam").flex(1.5))
        .column(ColumnDef::new("examDate", "Date").width(110));
    scd_columns(screen)
        .actions(
            RowActions::crud()
                .with_custom(CustomAction::new("grade", "Grade").requires(Action::Edit))
                .with_custom(CustomAction::new("publish", "Publish results")),
        )
        .scd_filters(&["subjectId"])
}

fn attendance() -> ScreenConfig {
    let screen = ScreenConfig::new("attendance", "Attendance", entities::ATTENDANCE, "attendance")
        .mode(RequestMode::GetQuery)
        .column(ColumnDef::new("studentName", "Student").flex(1.5))
        .column(ColumnDef::new("date", "Date").width(110))
        .column(ColumnDef::new("status", "Status").width(90).value_formatter(|value| {
            value_text(value).to_ascii_uppercase()
        }));
    scd_columns(screen)
        .actions(RowActions { view: true, edit: true, ..RowActions::none() })
        .scd_filters(&["date"])
}

fn assignments() -> ScreenConfig {
    let screen = ScreenConfig::new("assignments", "Assignments", entities::ASSIGNMENT, "assignments/search")
        .delete_path("assignments")
        .column(ColumnDef::new("title", "Assignment").flex(1.5))
        .column(ColumnDef::new("dueDate", "Due").width(110));
    scd_columns(screen)
        .actions(RowActions::crud())
        .scd_filters(&["subjectId"])
}

fn quizzes() -> ScreenConfig {
    let screen = ScreenConfig::new("quizzes", "Quizzes", entities::QUIZ, "quizzes/search")
        .delete_path("quizzes")
        .column(ColumnDef::new("title", "Quiz").flex(1.5))
        .column(ColumnDef::new("questionCount", "Questions").width(90))
        .column(ColumnDef::new("published", "Published").width(90).value_formatter(|value| {
            if value.as_bool().unwrap_or(false) { "yes".into() } else { "no".into() }
        }));
    scd_columns(screen)
        .actions(RowActions::crud().with_custom(CustomAction::new("publish", "Publish")))
        .scd_filters(&[])
}

fn timetables() -> ScreenConfig {
    let screen = ScreenConfig::new("timetables", "Timetables", entities::TIMETABLE, "timetables/search")
        .delete_path("timetables")
        .column(ColumnDef::new("dayOfWeek", "Day").width(100))
        .column(ColumnDef::new("period", "Period").width(70))
        .column(ColumnDef::new("subjectName", "Subject").flex(1.0))
        .column(ColumnDef::new("teacherName", "Teacher").flex(1.0));
    scd_columns(screen)
        .actions(RowActions::crud())
        .scd_filters(&["dayOfWeek"])
}

fn fee_structures() -> ScreenConfig {
    ScreenConfig::new("fees", "Fee structures", entities::FEE_STRUCTURE, "fee-structures/search")
        .delete_path("fee-structures")
        .column(ColumnDef::new("name", "Name").flex(1.5))
        .column(ColumnDef::new("amount", "Amount").width(100))
        .column(ColumnDef::new("frequency", "Frequency").width(100))
        .column(ColumnDef::new(keys::SCHOOL_ID, "School").flex(1.0))
        .column(ColumnDef::new(keys::CLASS_ID, "Class").width(100))
        .actions(RowActions::crud())
        .filters([keys::SCHOOL_ID, keys::CLASS_ID])
}

fn roles() -> ScreenConfig {
    ScreenConfig::new("roles", "Roles & permissions", entities::ROLE, "roles/search")
        .delete_path("roles")
        .column(ColumnDef::new("name", "Role").flex(1.0))
        .column(ColumnDef::new("entityCount", "Entities").width(90))
        .column(ColumnDef::new("system", "System").width(80))
        .actions(RowActions::crud())
        .row_id("roleId")
}

fn documents() -> ScreenConfig {
    let screen = ScreenConfig::new("documents", "Document hub", entities::DOCUMENT, "documents/search")
        .mode(RequestMode::GetWithBody)
        .delete_path("documents")
        .column(ColumnDef::new("fileName", "File").flex(1.5))
        .column(ColumnDef::new("category", "Category").width(110))
        .column(ColumnDef::new("uploadedAt", "Uploaded").width(120));
    scd_columns(screen)
        .actions(RowActions {
            view: true,
            delete: true,
            ..RowActions::none()
        }
        .with_custom(CustomAction::new("download", "Download").requires(Action::View)))
        .scd_filters(&["category"])
}

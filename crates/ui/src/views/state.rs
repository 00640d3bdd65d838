use dioxus::prelude::*;
use services::DashboardError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    MissingStudent,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingStudent => "No student found. Please login via CMS first.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&DashboardError> for ViewError {
    fn from(err: &DashboardError) -> Self {
        match err {
            DashboardError::MissingIdentity | DashboardError::StudentNotFound(_) => {
                Self::MissingStudent
            }
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::EnrollmentNumber;
    use storage::repository::StorageError;

    #[test]
    fn identity_errors_map_to_missing_student() {
        let missing = ViewError::from(&DashboardError::MissingIdentity);
        assert_eq!(missing, ViewError::MissingStudent);
        let unknown = ViewError::from(&DashboardError::StudentNotFound(
            EnrollmentNumber::new("E9").unwrap(),
        ));
        assert_eq!(unknown.message(), "No student found. Please login via CMS first.");
        let storage = ViewError::from(&DashboardError::Storage(StorageError::NotFound));
        assert_eq!(storage, ViewError::Unknown);
    }
}

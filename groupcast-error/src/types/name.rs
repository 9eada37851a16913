use std::{any::Any, fmt};

use crate::{ErrorExt, StatusCode};

/// Что именно называлось: канал или группа.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Channel,
    Group,
}

/// Имя канала или группы не является идентификатором
/// (ASCII буквы, цифры и `_`, не начинается с цифры, не пустое).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNameError {
    pub kind: NameKind,
    pub name: String,
}

impl InvalidNameError {
    pub fn new(
        kind: NameKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl NameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InvalidNameError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let title = match self.kind {
            NameKind::Channel => "Channel",
            NameKind::Group => "Group",
        };
        write!(
            f,
            "{title} names must be valid identifiers: only ASCII alphanumerics and \
             underscores are accepted and the first character cannot be a digit (got {:?})",
            self.name
        )
    }
}

impl std::error::Error for InvalidNameError {}

impl ErrorExt for InvalidNameError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidName
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", "invalid_name".to_string()),
            ("status_code", self.status_code().to_string()),
            ("name_kind", self.kind.to_string()),
        ]
    }
}

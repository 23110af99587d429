/// Where an output path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Native folder picker. Only the folder's display name is guaranteed.
    Picker,
    /// Typed into a text prompt.
    Manual,
}

/// Result of a successful path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Text shown in the path field.
    pub display_name: String,
    /// Absolute filesystem path when known.
    pub full_path: Option<String>,
    pub source: PathSource,
}

impl ResolvedPath {
    pub fn manual(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            display_name: path.clone(),
            full_path: Some(path),
            source: PathSource::Manual,
        }
    }

    pub fn picked(name: impl Into<String>, full_path: Option<String>) -> Self {
        Self {
            display_name: name.into(),
            full_path,
            source: PathSource::Picker,
        }
    }
}

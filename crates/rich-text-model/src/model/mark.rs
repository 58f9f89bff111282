use std::fmt;

use crate::error::{BuildError, MarkProblem};

/// Discriminant of a [`Mark`], used when marks are made from loose parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Code,
    Custom,
}

impl MarkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Underline => "underline",
            MarkKind::Code => "code",
            MarkKind::Custom => "custom",
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a custom mark. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkName(String);

impl MarkName {
    pub fn new(name: impl Into<String>) -> Result<Self, BuildError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BuildError::InvalidMark {
                reason: MarkProblem::MissingCustomName,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-structural decoration applied to a run of text.
///
/// Two marks are equal when both kind and custom name match, which is also
/// the key a [`MarkSet`] deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
    Custom(MarkName),
}

impl Mark {
    /// Build a mark from a kind and an optional custom name.
    ///
    /// Custom marks require a name; every other kind rejects one.
    ///
    /// ```rust
    /// # use rich_text_model::{Mark, MarkKind};
    /// assert_eq!(Mark::from_parts(MarkKind::Bold, None).unwrap(), Mark::Bold);
    /// assert!(Mark::from_parts(MarkKind::Custom, None).is_err());
    /// assert!(Mark::from_parts(MarkKind::Italic, Some("fancy")).is_err());
    /// ```
    pub fn from_parts(kind: MarkKind, custom_name: Option<&str>) -> Result<Self, BuildError> {
        match (kind, custom_name) {
            (MarkKind::Custom, Some(name)) => Ok(Mark::Custom(MarkName::new(name)?)),
            (MarkKind::Custom, None) => Err(BuildError::InvalidMark {
                reason: MarkProblem::MissingCustomName,
            }),
            (kind, Some(name)) => Err(BuildError::InvalidMark {
                reason: MarkProblem::UnexpectedName {
                    kind,
                    name: name.to_string(),
                },
            }),
            (MarkKind::Bold, None) => Ok(Mark::Bold),
            (MarkKind::Italic, None) => Ok(Mark::Italic),
            (MarkKind::Underline, None) => Ok(Mark::Underline),
            (MarkKind::Code, None) => Ok(Mark::Code),
        }
    }

    pub fn custom(name: impl Into<String>) -> Result<Self, BuildError> {
        Ok(Mark::Custom(MarkName::new(name)?))
    }

    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Bold => MarkKind::Bold,
            Mark::Italic => MarkKind::Italic,
            Mark::Underline => MarkKind::Underline,
            Mark::Code => MarkKind::Code,
            Mark::Custom(_) => MarkKind::Custom,
        }
    }

    pub fn custom_name(&self) -> Option<&str> {
        match self {
            Mark::Custom(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Custom(name) => write!(f, "custom:{name}"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Insertion-ordered set of marks.
///
/// Iteration follows insertion order, but equality ignores it: `{bold, italic}`
/// and `{italic, bold}` decorate text identically.
#[derive(Debug, Clone, Default)]
pub struct MarkSet {
    marks: Vec<Mark>,
}

impl MarkSet {
    pub const fn new() -> Self {
        Self { marks: Vec::new() }
    }

    /// Adds `mark` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, mark: Mark) -> bool {
        if self.contains(&mark) {
            return false;
        }
        self.marks.push(mark);
        true
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.marks.contains(mark)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.marks.iter()
    }
}

impl PartialEq for MarkSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|mark| other.contains(mark))
    }
}

impl Eq for MarkSet {}

impl Extend<Mark> for MarkSet {
    fn extend<I: IntoIterator<Item = Mark>>(&mut self, iter: I) {
        for mark in iter {
            self.insert(mark);
        }
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut set = MarkSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}

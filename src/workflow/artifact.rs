//! Artifact kinds flowing between workflow nodes.
//!
//! Every port carries exactly one of these kinds. The list kinds are
//! echo-indexed collections: a map node consumes one element per
//! expansion, a list-typed input takes the whole collection at once.

use serde::{Deserialize, Serialize};

/// The kind of data carried between workflow stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A single 3D image volume.
    Volume,
    /// A single numeric value.
    Scalar,
    /// An echo-indexed list of volumes.
    VolumeList,
    /// An echo-indexed list of scalars.
    ScalarList,
}

impl ArtifactKind {
    /// The element kind, if this is a list kind.
    pub fn element(self) -> Option<ArtifactKind> {
        match self {
            ArtifactKind::VolumeList => Some(ArtifactKind::Volume),
            ArtifactKind::ScalarList => Some(ArtifactKind::Scalar),
            _ => None,
        }
    }

    /// The list kind with this kind as element, if this is an element kind.
    pub fn list_of(self) -> Option<ArtifactKind> {
        match self {
            ArtifactKind::Volume => Some(ArtifactKind::VolumeList),
            ArtifactKind::Scalar => Some(ArtifactKind::ScalarList),
            _ => None,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, ArtifactKind::VolumeList | ArtifactKind::ScalarList)
    }

    /// Whether an output of this kind may feed an input declared as
    /// `input`. An iterfield input consumes one element of an upstream
    /// list per map expansion, so it also accepts the list of its
    /// declared kind.
    pub fn can_bind(self, input: ArtifactKind, iterfield: bool) -> bool {
        if self == input {
            return true;
        }
        iterfield && self.element() == Some(input)
    }

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::Volume => "volume",
            ArtifactKind::Scalar => "scalar",
            ArtifactKind::VolumeList => "volume list",
            ArtifactKind::ScalarList => "scalar list",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

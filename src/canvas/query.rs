/// Filter for [`crate::canvas::Canvas::get_elements`].
///
/// Each set dimension (identifiers, groups, layers) selects the union of its named members.
/// With `require_all` the dimensions are intersected, otherwise unioned. A query with no
/// dimension set selects every element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementQuery {
    pub identifiers: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    pub layers: Option<Vec<String>>,
    pub require_all: bool,
}

fn owned<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl ElementQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn identifiers<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.identifiers = Some(owned(ids));
        self
    }

    pub fn groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.groups = Some(owned(groups));
        self
    }

    pub fn layers<I>(mut self, layers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.layers = Some(owned(layers));
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.identifiers.is_none() && self.groups.is_none() && self.layers.is_none()
    }
}

use ustr::Ustr;

/// Kind of filter input a column shows, which also fixes the filter value shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterVariant {
    #[default]
    Text,
    Range,
    Select,
    Multiple,
    Combobox,
    Date,
}

impl FilterVariant {
    /// Unknown tags fall back to free text.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "range" => Self::Range,
            "select" => Self::Select,
            "multiple" => Self::Multiple,
            "combobox" => Self::Combobox,
            "date" => Self::Date,
            "text" => Self::Text,
            other => {
                log::debug!("unknown filter variant {other:?}, using text");
                Self::Text
            }
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Range => "range",
            Self::Select => "select",
            Self::Multiple => "multiple",
            Self::Combobox => "combobox",
            Self::Date => "date",
        }
    }

    /// Multiple and Combobox share the same value shape.
    pub fn is_multi(self) -> bool {
        matches!(self, Self::Multiple | Self::Combobox)
    }

    /// Variants whose options come from the column's facet values.
    pub fn uses_options(self) -> bool {
        matches!(self, Self::Select | Self::Multiple | Self::Combobox)
    }

    pub fn is_debounced(self) -> bool {
        matches!(self, Self::Text | Self::Range)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnKind {
    #[default]
    Data,
    /// Leading checkbox column.
    Selection,
}

/// Static description of one grid column.
#[derive(Debug, Clone, bon::Builder)]
pub struct ColumnDef {
    #[builder(into)]
    pub id: Ustr,
    #[builder(into)]
    pub title: String,
    #[builder(default)]
    pub kind: ColumnKind,
    #[builder(default)]
    pub filter: FilterVariant,
    /// Fixed option list. Select-like filters fall back to facet values when absent.
    pub options: Option<Vec<String>>,
    /// Other attributes matched by this column's free-text filter.
    #[builder(default)]
    pub extra_text_targets: Vec<Ustr>,
    #[builder(default)]
    pub header_align: Align,
    #[builder(default = 150.0)]
    pub width: f32,
    #[builder(default = 40.0)]
    pub min_width: f32,
    #[builder(default = 600.0)]
    pub max_width: f32,
    #[builder(default = true)]
    pub sortable: bool,
    #[builder(default = true)]
    pub hideable: bool,
    #[builder(default = true)]
    pub resizable: bool,
    #[builder(default = true)]
    pub pinnable: bool,
    #[builder(default = true)]
    pub filterable: bool,
}

impl ColumnDef {
    /// Checkbox column. Never sorted, filtered, hidden or resized.
    pub fn selection() -> Self {
        Self::builder()
            .id("select")
            .title("")
            .kind(ColumnKind::Selection)
            .width(36.0)
            .min_width(36.0)
            .max_width(36.0)
            .sortable(false)
            .hideable(false)
            .resizable(false)
            .filterable(false)
            .build()
    }

    pub fn clamp_width(&self, width: f32) -> f32 {
        let max = self.max_width.max(self.min_width);
        width.clamp(self.min_width, max)
    }

    pub fn is_data(&self) -> bool {
        self.kind == ColumnKind::Data
    }

    pub fn can_filter(&self) -> bool {
        self.filterable && self.is_data()
    }

    pub fn can_sort(&self) -> bool {
        self.sortable && self.is_data()
    }
}

pub fn find_column<'a>(columns: &'a [ColumnDef], id: &str) -> Option<&'a ColumnDef> {
    columns.iter().find(|column| column.id.as_str() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_fall_back_to_text() {
        assert_eq!(FilterVariant::from_tag("range"), FilterVariant::Range);
        assert_eq!(FilterVariant::from_tag(" Date "), FilterVariant::Date);
        assert_eq!(FilterVariant::from_tag("slider"), FilterVariant::Text);
        assert_eq!(FilterVariant::from_tag(""), FilterVariant::Text);
    }

    #[test]
    fn builder_defaults() {
        let column = ColumnDef::builder().id("salary").title("Salary").build();
        assert_eq!(column.filter, FilterVariant::Text);
        assert!(column.sortable && column.resizable && column.can_filter());
        assert_eq!(column.clamp_width(10.0), column.min_width);
        assert_eq!(column.clamp_width(10_000.0), column.max_width);
    }

    #[test]
    fn selection_column_is_inert() {
        let column = ColumnDef::selection();
        assert!(!column.can_sort());
        assert!(!column.can_filter());
        assert!(!column.hideable);
    }
}

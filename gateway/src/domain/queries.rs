use crate::domain::entities::{ReportStatus, ReportType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

// Listing parameters. Anything left as `None` is omitted from the request and the
// backend applies its own default (page 0, size 10, newest first, active only).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListReportsQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub report_type: Option<ReportType>,
    pub status: Option<ReportStatus>,
}

impl ListReportsQuery {
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_dir = Some(direction);
        self
    }

    pub fn of_type(mut self, report_type: ReportType) -> Self {
        self.report_type = Some(report_type);
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }
}

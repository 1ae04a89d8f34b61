use crate::domain::{Coordinate, ListReportsQuery, ReportStatus, ReportType};

// Query-string shapes of the reports API. Parameter names follow the backend's
// camelCase request params; unset values are never sent.

pub type QueryPairs = Vec<(String, String)>;

pub fn list_reports_params(query: &ListReportsQuery) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    if let Some(page) = query.page {
        pairs.push(("page".into(), page.to_string()));
    }
    if let Some(size) = query.size {
        pairs.push(("size".into(), size.to_string()));
    }
    if let Some(sort_by) = &query.sort_by {
        pairs.push(("sortBy".into(), sort_by.clone()));
    }
    if let Some(sort_dir) = query.sort_dir {
        pairs.push(("sortDir".into(), sort_dir.as_str().into()));
    }
    if let Some(report_type) = query.report_type {
        pairs.push(("type".into(), report_type.as_str().into()));
    }
    if let Some(status) = query.status {
        pairs.push(("status".into(), status.as_str().into()));
    }
    pairs
}

pub fn nearby_params(
    origin: Coordinate,
    radius_in_meters: Option<f64>,
    report_type: Option<ReportType>,
) -> QueryPairs {
    let mut pairs = vec![
        ("latitude".to_string(), origin.latitude.to_string()),
        ("longitude".to_string(), origin.longitude.to_string()),
    ];
    if let Some(radius) = radius_in_meters {
        pairs.push(("radiusInMeters".into(), radius.to_string()));
    }
    if let Some(report_type) = report_type {
        pairs.push(("type".into(), report_type.as_str().into()));
    }
    pairs
}

pub fn status_params(status: ReportStatus) -> QueryPairs {
    vec![("status".to_string(), status.as_str().to_string())]
}

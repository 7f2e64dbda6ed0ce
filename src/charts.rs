//! Chart.js configurations for the three dashboard charts.
//!
//! Only data and fixed styling live here. Function-valued options (tick and
//! tooltip formatters) cannot travel as JSON and are attached by `app.js`.

use serde_json::{json, Value};

use crate::catalog::{CourseEnrollment, EnrollmentYear, RegistrationStatus};

const PALETTE: [(u8, u8, u8); 6] = [
    (79, 70, 229),
    (14, 165, 233),
    (16, 185, 129),
    (245, 158, 11),
    (239, 68, 68),
    (139, 92, 246),
];

const TICK_COLOR: &str = "#64748b";
const GRID_COLOR: &str = "rgba(203, 213, 225, 0.3)";

/// Names accepted by `/api/admin/charts/:chart`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    StudentsPerCourse,
    RegistrationStatus,
    EnrollmentTrend,
}

impl ChartKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "studentsPerCourse" => Some(ChartKind::StudentsPerCourse),
            "registrationStatus" => Some(ChartKind::RegistrationStatus),
            "enrollmentTrend" => Some(ChartKind::EnrollmentTrend),
            _ => None,
        }
    }
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f32) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}

fn tooltip() -> Value {
    json!({
        "backgroundColor": "rgba(30, 41, 59, 0.9)",
        "titleColor": "#fff",
        "bodyColor": "#fff",
        "padding": 12,
        "cornerRadius": 8
    })
}

/// Bar chart, one coloured bar per course
pub fn students_per_course(data: &[CourseEnrollment]) -> Value {
    let labels: Vec<&str> = data.iter().map(|c| c.course_code.as_str()).collect();
    let values: Vec<u32> = data.iter().map(|c| c.student_count).collect();
    let background: Vec<String> = PALETTE.iter().map(|&c| rgba(c, 0.8)).collect();
    let border: Vec<String> = PALETTE.iter().map(|&c| rgba(c, 1.0)).collect();

    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Number of Students",
                "data": values,
                "backgroundColor": background,
                "borderColor": border,
                "borderWidth": 2,
                "borderRadius": 8
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "display": false },
                "tooltip": tooltip()
            },
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "ticks": { "stepSize": 1, "color": TICK_COLOR },
                    "grid": { "color": GRID_COLOR }
                },
                "x": {
                    "ticks": { "color": TICK_COLOR },
                    "grid": { "display": false }
                }
            }
        }
    })
}

/// Side-by-side registered / not registered bars per course
pub fn registration_status(data: &[RegistrationStatus]) -> Value {
    let labels: Vec<&str> = data.iter().map(|c| c.course_code.as_str()).collect();
    let registered: Vec<u32> = data.iter().map(|c| c.registered).collect();
    let not_registered: Vec<u32> = data.iter().map(|c| c.not_registered).collect();
    let green = PALETTE[2];
    let red = PALETTE[4];

    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "label": "Registered",
                    "data": registered,
                    "backgroundColor": rgba(green, 0.8),
                    "borderColor": rgba(green, 1.0),
                    "borderWidth": 2,
                    "borderRadius": 4
                },
                {
                    "label": "Not Registered",
                    "data": not_registered,
                    "backgroundColor": rgba(red, 0.8),
                    "borderColor": rgba(red, 1.0),
                    "borderWidth": 2,
                    "borderRadius": 4
                }
            ]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {
                    "position": "top",
                    "labels": { "usePointStyle": true, "padding": 20, "color": "#475569" }
                },
                "tooltip": tooltip()
            },
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "stacked": false,
                    "ticks": { "color": TICK_COLOR },
                    "grid": { "color": GRID_COLOR }
                },
                "x": {
                    "stacked": false,
                    "ticks": { "color": TICK_COLOR },
                    "grid": { "display": false }
                }
            }
        }
    })
}

/// Filled line of faculty enrollment per year
pub fn enrollment_trend(data: &[EnrollmentYear]) -> Value {
    let labels: Vec<String> = data.iter().map(|y| y.year.to_string()).collect();
    let values: Vec<u32> = data.iter().map(|y| y.student_count).collect();
    let indigo = PALETTE[0];

    let mut tooltip = tooltip();
    tooltip["displayColors"] = json!(false);

    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Students",
                "data": values,
                "borderColor": rgba(indigo, 1.0),
                "backgroundColor": rgba(indigo, 0.15),
                "fill": true,
                "tension": 0.4,
                "pointBackgroundColor": rgba(indigo, 1.0),
                "pointBorderColor": "white",
                "pointBorderWidth": 2,
                "pointRadius": 6,
                "pointHoverRadius": 8,
                "borderWidth": 3
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": { "display": false },
                "tooltip": tooltip
            },
            "scales": {
                "y": {
                    "beginAtZero": false,
                    "ticks": { "color": TICK_COLOR },
                    "grid": { "color": GRID_COLOR }
                },
                "x": {
                    "ticks": { "color": TICK_COLOR },
                    "grid": { "color": GRID_COLOR }
                }
            },
            "interaction": { "mode": "nearest", "axis": "x", "intersect": false }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, StaticCatalog, TrendWindow};

    #[test]
    fn chart_names_round_trip_to_kinds() {
        assert_eq!(ChartKind::from_name("studentsPerCourse"), Some(ChartKind::StudentsPerCourse));
        assert_eq!(ChartKind::from_name("enrollmentTrend"), Some(ChartKind::EnrollmentTrend));
        assert_eq!(ChartKind::from_name("pie"), None);
    }

    #[test]
    fn students_chart_labels_are_course_codes() {
        let chart = students_per_course(&StaticCatalog.students_per_course());
        assert_eq!(chart["type"], "bar");
        assert_eq!(
            chart["data"]["labels"],
            json!(["SECJH", "SECRH", "SECVH", "SECBH", "SECPH"])
        );
        assert_eq!(chart["data"]["datasets"][0]["data"], json!([749, 550, 600, 320, 420]));
        assert_eq!(
            chart["data"]["datasets"][0]["backgroundColor"][0],
            "rgba(79, 70, 229, 0.8)"
        );
        assert_eq!(chart["data"]["datasets"][0]["borderColor"][0], "rgba(79, 70, 229, 1)");
    }

    #[test]
    fn registration_chart_has_two_unstacked_series() {
        let chart = registration_status(&StaticCatalog.registration_status());
        let datasets = chart["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0]["label"], "Registered");
        assert_eq!(datasets[1]["label"], "Not Registered");
        assert_eq!(datasets[1]["data"], json!([304, 222, 244, 135, 167]));
        assert_eq!(chart["options"]["scales"]["x"]["stacked"], false);
    }

    #[test]
    fn trend_chart_labels_years_as_strings() {
        let chart = enrollment_trend(&StaticCatalog.enrollment_trend(TrendWindow::FiveYears));
        assert_eq!(chart["type"], "line");
        assert_eq!(
            chart["data"]["labels"],
            json!(["2022", "2023", "2024", "2025", "2026"])
        );
        assert_eq!(chart["options"]["plugins"]["tooltip"]["displayColors"], false);
    }
}

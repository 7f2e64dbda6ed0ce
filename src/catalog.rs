//! Reporting data behind the dashboard charts and counters.
//!
//! Handlers only talk to the [`Catalog`] trait. [`StaticCatalog`] serves the
//! fixed faculty figures; a database-backed implementation only has to
//! provide the three raw accessors.

use serde::Serialize;
use std::collections::BTreeMap;

/// A degree programme with its registration figures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Course {
    pub code: &'static str,
    pub name: &'static str,
    pub student_count: u32,
    pub registered: u32,
    pub pending_count: u32,
}

impl Course {
    pub fn not_registered(&self) -> u32 {
        self.student_count.saturating_sub(self.registered)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentYear {
    pub year: i32,
    pub student_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u32,
    pub total_courses: usize,
    pub total_registrations: u32,
    pub pending_registrations: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnrollment {
    pub course_name: String,
    pub course_code: String,
    pub student_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatus {
    pub course_code: String,
    pub course_name: String,
    pub registered: u32,
    pub not_registered: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSummary {
    pub course_code: String,
    pub course_name: String,
    pub pending_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingStudent {
    pub student_id: String,
    pub student_name: String,
    pub course_code: String,
    pub course_name: String,
    pub submitted_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingRegistrations {
    pub summary: Vec<PendingSummary>,
    pub registrations: BTreeMap<String, Vec<PendingStudent>>,
}

/// How much enrollment history a trend request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendWindow {
    FiveYears,
    TenYears,
}

impl TrendWindow {
    /// Only an explicit 10 widens the window; anything else is five years.
    pub fn from_years_back(years_back: Option<i64>) -> Self {
        match years_back {
            Some(10) => TrendWindow::TenYears,
            _ => TrendWindow::FiveYears,
        }
    }

    pub fn years(self) -> usize {
        match self {
            TrendWindow::FiveYears => 5,
            TrendWindow::TenYears => 10,
        }
    }
}

pub trait Catalog: Send + Sync {
    /// Courses in display order
    fn courses(&self) -> &[Course];

    /// Yearly faculty enrollment, ascending by year
    fn enrollment_history(&self) -> &[EnrollmentYear];

    /// Students waiting for approval in one course
    fn pending_students(&self, course_code: &str) -> Vec<PendingStudent>;

    fn dashboard_stats(&self) -> DashboardStats {
        let courses = self.courses();
        DashboardStats {
            total_students: courses.iter().map(|c| c.student_count).sum(),
            total_courses: courses.len(),
            total_registrations: courses.iter().map(|c| c.registered).sum(),
            pending_registrations: courses.iter().map(|c| c.pending_count).sum(),
        }
    }

    fn students_per_course(&self) -> Vec<CourseEnrollment> {
        self.courses()
            .iter()
            .map(|c| CourseEnrollment {
                course_name: c.name.to_string(),
                course_code: c.code.to_string(),
                student_count: c.student_count,
            })
            .collect()
    }

    fn enrollment_trend(&self, window: TrendWindow) -> Vec<EnrollmentYear> {
        let history = self.enrollment_history();
        let start = history.len().saturating_sub(window.years());
        history[start..].to_vec()
    }

    fn registration_status(&self) -> Vec<RegistrationStatus> {
        self.courses()
            .iter()
            .map(|c| RegistrationStatus {
                course_code: c.code.to_string(),
                course_name: c.name.to_string(),
                registered: c.registered,
                not_registered: c.not_registered(),
            })
            .collect()
    }

    fn pending_registrations(&self) -> PendingRegistrations {
        let courses = self.courses();
        let summary = courses
            .iter()
            .map(|c| PendingSummary {
                course_code: c.code.to_string(),
                course_name: c.name.to_string(),
                pending_count: c.pending_count,
            })
            .collect();
        let registrations = courses
            .iter()
            .map(|c| (c.code.to_string(), self.pending_students(c.code)))
            .collect();

        PendingRegistrations {
            summary,
            registrations,
        }
    }
}

const COURSES: [Course; 5] = [
    Course { code: "SECJH", name: "Software Engineering", student_count: 749, registered: 445, pending_count: 45 },
    Course { code: "SECRH", name: "Network and Cybersecurity", student_count: 550, registered: 328, pending_count: 32 },
    Course { code: "SECVH", name: "Graphic and Computer Multimedia", student_count: 600, registered: 356, pending_count: 38 },
    Course { code: "SECBH", name: "Bioinformatics", student_count: 320, registered: 185, pending_count: 18 },
    Course { code: "SECPH", name: "Data Engineering", student_count: 420, registered: 253, pending_count: 23 },
];

const ENROLLMENT_HISTORY: [EnrollmentYear; 10] = [
    EnrollmentYear { year: 2017, student_count: 2456 },
    EnrollmentYear { year: 2018, student_count: 2312 },
    EnrollmentYear { year: 2019, student_count: 2589 },
    EnrollmentYear { year: 2020, student_count: 2234 },
    EnrollmentYear { year: 2021, student_count: 2478 },
    EnrollmentYear { year: 2022, student_count: 2356 },
    EnrollmentYear { year: 2023, student_count: 2687 },
    EnrollmentYear { year: 2024, student_count: 2512 },
    EnrollmentYear { year: 2025, student_count: 2745 },
    EnrollmentYear { year: 2026, student_count: 2639 },
];

// (course code, student id, student name, submitted date)
const PENDING_STUDENTS: &[(&str, &str, &str, &str)] = &[
    ("SECJH", "A23CS0156", "Muhammad Syahmi Faris bin Rusli", "2026-01-15"),
    ("SECJH", "A23CS0445", "Muhammad Adam bin Razali", "2026-01-15"),
    ("SECJH", "A23CS0523", "Danish Hakim bin Aziz", "2026-01-14"),
    ("SECJH", "A23CS0601", "Ahmad Farhan bin Yusof", "2026-01-14"),
    ("SECJH", "A23CS0612", "Nurul Aina binti Kamal", "2026-01-13"),
    ("SECJH", "A23CS0623", "Mohd Haziq bin Ismail", "2026-01-13"),
    ("SECJH", "A23CS0634", "Siti Aminah binti Rahman", "2026-01-12"),
    ("SECJH", "A23CS0645", "Khairul Anwar bin Samad", "2026-01-12"),
    ("SECJH", "A23CS0656", "Nur Atiqah binti Hassan", "2026-01-11"),
    ("SECJH", "A23CS0667", "Muhammad Irfan bin Azman", "2026-01-11"),
    ("SECRH", "A23CS0234", "Muhammad Naim bin Abdullah", "2026-01-15"),
    ("SECRH", "A23CS0267", "Nuraisyah binti Zikre", "2026-01-15"),
    ("SECRH", "A23CS0701", "Amir Hamzah bin Kamal", "2026-01-14"),
    ("SECRH", "A23CS0712", "Sarina binti Hashim", "2026-01-14"),
    ("SECRH", "A23CS0723", "Mohd Faiz bin Osman", "2026-01-13"),
    ("SECRH", "A23CS0734", "Nur Hidayah binti Razak", "2026-01-13"),
    ("SECRH", "A23CS0745", "Ahmad Danial bin Zainal", "2026-01-12"),
    ("SECRH", "A23CS0756", "Fatimah binti Abdullah", "2026-01-12"),
    ("SECRH", "A23CS0767", "Haziq bin Jaafar", "2026-01-11"),
    ("SECRH", "A23CS0778", "Aina Sofea binti Noor", "2026-01-11"),
    ("SECVH", "A23CS0189", "Muhammad Afiq Danish bin Mohd Hazni", "2026-01-15"),
    ("SECVH", "A23CS0178", "Hoe Zhi Wan", "2026-01-15"),
    ("SECVH", "A23CS0801", "Tan Wei Ming", "2026-01-14"),
    ("SECVH", "A23CS0812", "Lim Siew Ling", "2026-01-14"),
    ("SECVH", "A23CS0823", "Wong Kai Xin", "2026-01-13"),
    ("SECVH", "A23CS0834", "Nurul Syafiqah binti Ali", "2026-01-13"),
    ("SECVH", "A23CS0845", "Lee Jun Wei", "2026-01-12"),
    ("SECVH", "A23CS0856", "Ong Mei Ying", "2026-01-12"),
    ("SECVH", "A23CS0867", "Ahmad Zulkifli bin Hassan", "2026-01-11"),
    ("SECVH", "A23CS0878", "Ng Wei Lin", "2026-01-11"),
    ("SECBH", "A23CS0312", "Welson Woong Lu Bin", "2026-01-15"),
    ("SECBH", "A23CS0901", "Nurul Aisyah binti Razak", "2026-01-15"),
    ("SECBH", "A23CS0912", "Irfan bin Mohd Noor", "2026-01-14"),
    ("SECBH", "A23CS0923", "Chan Siew Mei", "2026-01-14"),
    ("SECBH", "A23CS0934", "Mohd Hafiz bin Yusof", "2026-01-13"),
    ("SECBH", "A23CS0945", "Nur Amira binti Kamal", "2026-01-13"),
    ("SECBH", "A23CS0956", "Tan Jia Wei", "2026-01-12"),
    ("SECBH", "A23CS0967", "Siti Nur Ain binti Samad", "2026-01-12"),
    ("SECBH", "A23CS0978", "Lim Chun Kiat", "2026-01-11"),
    ("SECBH", "A23CS0989", "Ahmad Firdaus bin Rahman", "2026-01-11"),
    ("SECPH", "A23CS0098", "Ang Chun Wei", "2026-01-15"),
    ("SECPH", "A23CS0334", "Muhammad Amirun Irfan bin Samsul Shah", "2026-01-15"),
    ("SECPH", "A23CS1001", "Mohd Farhan bin Yusof", "2026-01-14"),
    ("SECPH", "A23CS1012", "Aina Sofea binti Zainal", "2026-01-14"),
    ("SECPH", "A23CS1023", "Haziq bin Jaafar", "2026-01-13"),
    ("SECPH", "A23CS1034", "Nurul Izzah binti Osman", "2026-01-13"),
    ("SECPH", "A23CS1045", "Wong Jia Hao", "2026-01-12"),
    ("SECPH", "A23CS1056", "Siti Zulaikha binti Ismail", "2026-01-12"),
    ("SECPH", "A23CS1067", "Lee Wei Jie", "2026-01-11"),
    ("SECPH", "A23CS1078", "Nur Fatin binti Hashim", "2026-01-11"),
];

/// Fixed Faculty of Computing figures for the 2025/2026 intake
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCatalog;

impl Catalog for StaticCatalog {
    fn courses(&self) -> &[Course] {
        &COURSES
    }

    fn enrollment_history(&self) -> &[EnrollmentYear] {
        &ENROLLMENT_HISTORY
    }

    fn pending_students(&self, course_code: &str) -> Vec<PendingStudent> {
        let Some(course) = COURSES.iter().find(|c| c.code == course_code) else {
            return Vec::new();
        };

        PENDING_STUDENTS
            .iter()
            .filter(|(code, ..)| *code == course_code)
            .map(|(_, id, name, date)| PendingStudent {
                student_id: id.to_string(),
                student_name: name.to_string(),
                course_code: course.code.to_string(),
                course_name: course.name.to_string(),
                submitted_date: date.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_totals_match_published_figures() {
        let stats = StaticCatalog.dashboard_stats();
        assert_eq!(
            stats,
            DashboardStats {
                total_students: 2639,
                total_courses: 5,
                total_registrations: 1567,
                pending_registrations: 156,
            }
        );
    }

    #[test]
    fn registered_and_not_registered_cover_every_student() {
        for course in StaticCatalog.courses() {
            assert_eq!(course.registered + course.not_registered(), course.student_count);
        }
        let status = StaticCatalog.registration_status();
        assert_eq!(status[0].not_registered, 304);
        assert_eq!(status.iter().map(|s| s.not_registered).sum::<u32>(), 1072);
    }

    #[test]
    fn trend_window_only_widens_for_ten() {
        assert_eq!(TrendWindow::from_years_back(Some(10)), TrendWindow::TenYears);
        for other in [None, Some(5), Some(7), Some(0), Some(-10), Some(100)] {
            assert_eq!(TrendWindow::from_years_back(other), TrendWindow::FiveYears);
        }
    }

    #[test]
    fn enrollment_trend_slices_the_tail() {
        let ten = StaticCatalog.enrollment_trend(TrendWindow::TenYears);
        let years: Vec<i32> = ten.iter().map(|y| y.year).collect();
        assert_eq!(years, (2017..=2026).collect::<Vec<_>>());

        let five = StaticCatalog.enrollment_trend(TrendWindow::FiveYears);
        assert_eq!(five.as_slice(), &ten[5..]);
        assert_eq!(five.last().map(|y| y.student_count), Some(2639));
    }

    #[test]
    fn pending_rows_are_ten_per_course_regardless_of_summary() {
        let pending = StaticCatalog.pending_registrations();
        assert_eq!(pending.registrations.len(), 5);
        for summary in &pending.summary {
            let rows = &pending.registrations[&summary.course_code];
            assert_eq!(rows.len(), 10);
            // the summary counts are separate figures, larger than the sample list
            assert!(summary.pending_count >= rows.len() as u32);
            assert!(rows.iter().all(|r| r.course_name == summary.course_name));
        }
    }

    #[test]
    fn unknown_course_has_no_pending_students() {
        assert!(StaticCatalog.pending_students("SECXX").is_empty());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(StaticCatalog.dashboard_stats()).unwrap();
        assert_eq!(json["totalStudents"], 2639);
        assert_eq!(json["pendingRegistrations"], 156);
    }
}

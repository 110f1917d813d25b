use serde::Serialize;

use crate::config::{EducationConfig, Semester};

/// Income, expense, and survivors of one block of semesters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EducationResult {
    pub income: f64,
    pub expense: f64,
    pub net_revenue: f64,
    pub students_remaining: f64,
}

/// Run a cohort through `semesters` in order.
///
/// Every charge uses the cohort size at the moment it is computed; dropout is
/// applied once after each term. Headcounts stay fractional here.
pub fn education_phase(
    students_start: f64,
    semesters: &[Semester],
    tuition_per_credit: f64,
    cfg: &EducationConfig,
) -> EducationResult {
    let fees = &cfg.semester_fees;
    let semester_costs = &cfg.semester_costs;
    let term_costs = &cfg.term_costs;
    let credits = cfg.credits_per_term as f64;

    let mut income = 0.0;
    let mut expense = 0.0;
    let mut students = students_start;

    for semester in semesters {
        income += students
            * (fees.program_per_student + fees.general_per_student + fees.technology_per_student);
        expense += students
            * (semester_costs.technology_per_student + semester_costs.general_per_student);

        for term in &semester.terms {
            income += students * tuition_per_credit * credits;

            let mut term_expense = students * term_costs.instructor_per_student;
            if term.has_licensed_content {
                term_expense += students * term_costs.content_per_credit_hour;
            }
            if term.has_intensive_lecturer {
                term_expense += term_costs.intensive_lecturer;
            }
            if term.has_intensive_experience {
                term_expense += term_costs.intensive_experience;
            }
            expense += term_expense;

            students *= 1.0 - cfg.dropout_rate_per_term;
        }
    }

    EducationResult {
        income,
        expense,
        net_revenue: income - expense,
        students_remaining: students,
    }
}

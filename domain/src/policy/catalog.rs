//! Built-in policy catalog
//!
//! The seven policy areas of the refugee-education scenario, three
//! options each (one per tier). The catalog is static reference data;
//! callers build a [`PolicySelection`](super::PolicySelection) from it.

use super::entities::{PolicyArea, PolicyImpact, PolicyOption};

/// The default policy areas available in the simulation.
pub fn default_policy_areas() -> Vec<PolicyArea> {
    vec![
        area(
            "access",
            "Access to Education",
            "Policies related to how refugee students gain entry to the education system.",
            [
                ("a1", "Separate Schools", "Create separate schools for refugees with minimal resources."),
                ("a2", "Partial Integration", "Allow refugees to attend local schools with some restrictions."),
                ("a3", "Full Integration", "Fully integrate refugees into local schools with comprehensive support."),
            ],
        ),
        area(
            "language",
            "Language Instruction",
            "Approaches to language education for refugee students.",
            [
                ("l1", "Monolingual Approach", "Teach only in the official language, no mother tongue support."),
                ("l2", "Limited Bilingual Support", "Provide basic mother tongue support during transition period."),
                ("l3", "Comprehensive Multilingual Education", "Develop full multilingual curriculum and resources."),
            ],
        ),
        area(
            "teachers",
            "Teacher Training",
            "Professional development for educators working with refugee students.",
            [
                ("t1", "No Additional Training", "Rely on existing teacher skills with no refugee-specific training."),
                ("t2", "Basic Diversity Workshops", "Provide short-term diversity and inclusion training for teachers."),
                ("t3", "Comprehensive Refugee Education Certification", "Develop specialized certification program for teaching refugee populations."),
            ],
        ),
        area(
            "curriculum",
            "Curriculum Adaptation",
            "Changes to educational content to reflect refugee experiences.",
            [
                ("c1", "Standard Curriculum Only", "No adaptation of existing curriculum for refugee students."),
                ("c2", "Supplemental Materials", "Add cultural supplements to existing curriculum."),
                ("c3", "Inclusive Curriculum Redesign", "Completely redesign curriculum to be culturally responsive and inclusive."),
            ],
        ),
        area(
            "psychosocial",
            "Psychosocial Support",
            "Mental health and social-emotional wellbeing initiatives for refugees.",
            [
                ("p1", "No Dedicated Support", "No specialized mental health resources for refugee students."),
                ("p2", "Basic Counseling Services", "Limited counseling and group support activities."),
                ("p3", "Comprehensive Trauma-Informed Care", "Full trauma-informed ecosystem with specialized personnel and family support."),
            ],
        ),
        area(
            "financial",
            "Financial Support",
            "Economic assistance for refugee students and families.",
            [
                ("f1", "No Financial Assistance", "No dedicated financial support for refugee education."),
                ("f2", "Basic Needs Stipend", "Provide stipends for school supplies and basic materials."),
                ("f3", "Comprehensive Support Package", "Full scholarship program including family subsistence support."),
            ],
        ),
        area(
            "certification",
            "Certification/Accreditation",
            "Recognition of prior learning and qualifications from home countries.",
            [
                ("cr1", "No Recognition", "No recognition of prior education or qualifications."),
                ("cr2", "Partial Recognition", "Limited recognition of prior learning with extensive verification."),
                ("cr3", "Full Recognition System", "Comprehensive system for validating and recognizing prior education."),
            ],
        ),
    ]
}

/// Look up a policy option by id across all default areas.
pub fn find_option(areas: &[PolicyArea], id: &str) -> Option<PolicyOption> {
    areas
        .iter()
        .flat_map(|a| a.options.iter())
        .find(|o| o.id == id)
        .cloned()
}

// Tier and impact go together in the catalog: tier 1 options are
// exclusionary, tier 2 moderate, tier 3 transformative.
fn area(id: &str, title: &str, description: &str, options: [(&str, &str, &str); 3]) -> PolicyArea {
    let impacts = [
        PolicyImpact::Exclusionary,
        PolicyImpact::ModerateInclusion,
        PolicyImpact::Transformative,
    ];

    let mut area = PolicyArea::new(id, title, description);
    for (i, (oid, otitle, odesc)) in options.into_iter().enumerate() {
        area = area.with_option(PolicyOption::new(
            oid,
            otitle,
            odesc,
            impacts[i],
            (i + 1) as u32,
            title,
        ));
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let areas = default_policy_areas();
        assert_eq!(areas.len(), 7);
        for area in &areas {
            assert_eq!(area.options.len(), 3);
            for (i, option) in area.options.iter().enumerate() {
                assert_eq!(option.tier, (i + 1) as u32);
                assert_eq!(option.area, area.title);
            }
        }
    }

    #[test]
    fn test_find_option() {
        let areas = default_policy_areas();
        let option = find_option(&areas, "l3").unwrap();
        assert_eq!(option.title, "Comprehensive Multilingual Education");
        assert_eq!(option.tier, 3);
        assert_eq!(option.impact, PolicyImpact::Transformative);

        assert!(find_option(&areas, "nope").is_none());
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let areas = default_policy_areas();
        let mut ids: Vec<&str> = areas
            .iter()
            .flat_map(|a| a.options.iter())
            .map(|o| o.id.as_str())
            .collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }
}

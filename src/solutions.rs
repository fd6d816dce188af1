//! Suggested-action generation: static per-category playbooks matched
//! against report text, plus city-wide program suggestions derived from the
//! aggregate.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Report;
use crate::taxonomy::FALLBACK_CATEGORY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cost {
    Free,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy)]
struct SolutionTemplate {
    /// Matched as a substring of the report text, or word-by-word.
    trigger: &'static str,
    title: &'static str,
    description: &'static str,
    steps: &'static [&'static str],
    priority: Priority,
    estimated_time: &'static str,
    cost: Cost,
    responsible: &'static [&'static str],
    resources: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub priority: Priority,
    pub estimated_time: String,
    pub cost: Cost,
    pub responsible: Vec<String>,
    pub resources: Vec<String>,
}

const HOUSING_TEMPLATES: &[SolutionTemplate] = &[
    SolutionTemplate {
        trigger: "heating issue",
        title: "Heating System Repair",
        description: "Address heating problems in residential buildings",
        steps: &[
            "Contact building management or landlord immediately",
            "Document the issue with photos and temperature readings",
            "Check if other units are affected",
            "Contact local housing authority if landlord is unresponsive",
            "Consider temporary heating solutions for safety",
        ],
        priority: Priority::High,
        estimated_time: "1-3 days",
        cost: Cost::Medium,
        responsible: &["Building Management", "HVAC Technician", "Housing Authority"],
        resources: &[
            "Tenant Rights Guide",
            "Emergency Heating Assistance",
            "HVAC Repair Services",
        ],
    },
    SolutionTemplate {
        trigger: "water problem",
        title: "Water System Maintenance",
        description: "Resolve water supply and quality issues",
        steps: &[
            "Report to water utility company immediately",
            "Document water quality issues with photos/samples",
            "Check with neighbors about similar problems",
            "Contact health department for water quality concerns",
            "Arrange temporary water supply if needed",
        ],
        priority: Priority::Critical,
        estimated_time: "4-24 hours",
        cost: Cost::Low,
        responsible: &["Water Utility", "Health Department", "Building Management"],
        resources: &[
            "Water Quality Testing",
            "Emergency Water Supply",
            "Utility Contact Info",
        ],
    },
];

const ROADS_TEMPLATES: &[SolutionTemplate] = &[
    SolutionTemplate {
        trigger: "pothole",
        title: "Road Surface Repair",
        description: "Fix dangerous potholes and road damage",
        steps: &[
            "Report to city transportation department",
            "Document location with GPS coordinates",
            "Take photos showing size and severity",
            "Submit online complaint or call hotline",
            "Follow up if not addressed within reasonable time",
        ],
        priority: Priority::Medium,
        estimated_time: "1-2 weeks",
        cost: Cost::Medium,
        responsible: &["City Transportation", "Road Maintenance Crew"],
        resources: &[
            "City Complaint Portal",
            "Transportation Department Contact",
            "Road Repair Timeline",
        ],
    },
    SolutionTemplate {
        trigger: "traffic jam",
        title: "Traffic Flow Optimization",
        description: "Improve traffic management and reduce congestion",
        steps: &[
            "Analyze traffic patterns and peak hours",
            "Report to traffic management authority",
            "Suggest alternative routes to commuters",
            "Propose traffic signal timing adjustments",
            "Consider public transportation alternatives",
        ],
        priority: Priority::Medium,
        estimated_time: "2-4 weeks",
        cost: Cost::High,
        responsible: &["Traffic Management", "City Planning", "Transportation Authority"],
        resources: &[
            "Traffic Analysis Tools",
            "Public Transit Info",
            "Alternative Route Maps",
        ],
    },
];

const TRANSPORT_TEMPLATES: &[SolutionTemplate] = &[SolutionTemplate {
    trigger: "bus delay",
    title: "Public Transit Improvement",
    description: "Address delays and improve service reliability",
    steps: &[
        "Report delays to transit authority",
        "Document patterns of delays with times/dates",
        "Check for service alerts and updates",
        "Suggest schedule adjustments based on data",
        "Advocate for additional buses during peak hours",
    ],
    priority: Priority::Medium,
    estimated_time: "2-6 weeks",
    cost: Cost::High,
    responsible: &["Transit Authority", "Route Planners", "Operations Management"],
    resources: &["Transit App", "Service Alerts", "Customer Service Contact"],
}];

const SAFETY_TEMPLATES: &[SolutionTemplate] = &[SolutionTemplate {
    trigger: "crime",
    title: "Community Safety Enhancement",
    description: "Improve neighborhood security and safety measures",
    steps: &[
        "Report incidents to police immediately",
        "Contact community policing officer",
        "Organize neighborhood watch program",
        "Improve lighting in problem areas",
        "Install security cameras if appropriate",
    ],
    priority: Priority::High,
    estimated_time: "1-8 weeks",
    cost: Cost::Medium,
    responsible: &["Police Department", "Community Leaders", "City Council"],
    resources: &[
        "Police Non-Emergency Line",
        "Community Safety Programs",
        "Neighborhood Watch Guide",
    ],
}];

const ENVIRONMENT_TEMPLATES: &[SolutionTemplate] = &[SolutionTemplate {
    trigger: "pollution",
    title: "Environmental Cleanup Initiative",
    description: "Address pollution and environmental health concerns",
    steps: &[
        "Report to environmental protection agency",
        "Document pollution sources with evidence",
        "Contact local health department",
        "Organize community cleanup events",
        "Advocate for stricter environmental regulations",
    ],
    priority: Priority::High,
    estimated_time: "2-12 weeks",
    cost: Cost::Medium,
    responsible: &["EPA", "Health Department", "Environmental Groups"],
    resources: &[
        "Pollution Reporting Portal",
        "Environmental Testing",
        "Community Action Groups",
    ],
}];

const TEMPLATES_BY_CATEGORY: &[(&str, &[SolutionTemplate])] = &[
    ("Housing", HOUSING_TEMPLATES),
    ("Roads", ROADS_TEMPLATES),
    ("Transport", TRANSPORT_TEMPLATES),
    ("Safety", SAFETY_TEMPLATES),
    ("Environment", ENVIRONMENT_TEMPLATES),
];

/// Pick the first template whose trigger (whole phrase, or any of its words)
/// occurs in the report text; otherwise build the generic playbook.
pub fn generate_solution(report: &Report) -> Solution {
    let category = report.category.as_deref().unwrap_or(FALLBACK_CATEGORY);
    let text = report.text.to_lowercase();

    let templates = TEMPLATES_BY_CATEGORY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, templates)| *templates)
        .unwrap_or_default();

    for template in templates {
        let matches = text.contains(template.trigger)
            || template.trigger.split(' ').any(|word| text.contains(word));
        if matches {
            return Solution {
                id: format!("solution_{}", report.id),
                title: format!("{} - {}", template.title, report.district),
                description: format!("{} in {}", template.description, report.location),
                steps: template.steps.iter().map(|s| s.to_string()).collect(),
                priority: template.priority,
                estimated_time: template.estimated_time.to_string(),
                cost: template.cost,
                responsible: template.responsible.iter().map(|s| s.to_string()).collect(),
                resources: template.resources.iter().map(|s| s.to_string()).collect(),
            };
        }
    }

    generic_solution(report)
}

fn generic_solution(report: &Report) -> Solution {
    let priority = if report.severity.map(|s| s > 7).unwrap_or(false) {
        Priority::High
    } else {
        Priority::Medium
    };
    Solution {
        id: format!("solution_{}", report.id),
        title: format!("Address Issue in {}", report.district),
        description: format!(
            "General solution approach for reported problem in {}",
            report.location
        ),
        steps: [
            "Document the issue with photos and detailed description",
            "Contact relevant city department or authority",
            "Submit formal complaint through official channels",
            "Follow up regularly on progress",
            "Engage community support if needed",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        priority,
        estimated_time: "1-4 weeks".to_string(),
        cost: Cost::Medium,
        responsible: vec![
            "City Administration".to_string(),
            "Local Representatives".to_string(),
        ],
        resources: vec![
            "City Complaint Portal".to_string(),
            "Local Government Contacts".to_string(),
            "Community Resources".to_string(),
        ],
    }
}

/// One solution per analyzed report.
pub fn batch_solutions(reports: &[Report]) -> Vec<Solution> {
    reports
        .iter()
        .filter(|r| r.analyzed && r.category.is_some())
        .map(generate_solution)
        .collect()
}

const CITYWIDE_CATEGORY_THRESHOLD: u32 = 5;
const DISTRICT_FOCUS_THRESHOLD: u32 = 3;

/// Program-level suggestions when one category or district dominates.
pub fn city_wide_solutions(reports: &[Report]) -> Vec<Solution> {
    let mut category_counts: BTreeMap<&str, u32> = BTreeMap::new();
    let mut district_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for report in reports {
        if let Some(category) = &report.category {
            *category_counts.entry(category.as_str()).or_insert(0) += 1;
        }
        *district_counts.entry(report.district.as_str()).or_insert(0) += 1;
    }

    let mut solutions = Vec::new();

    if let Some((category, count)) = top_entry(&category_counts) {
        if count > CITYWIDE_CATEGORY_THRESHOLD {
            solutions.push(Solution {
                id: "citywide_category".to_string(),
                title: format!("City-Wide {category} Improvement Initiative"),
                description: format!(
                    "Comprehensive plan to address {} issues across the city",
                    category.to_lowercase()
                ),
                steps: vec![
                    format!(
                        "Conduct city-wide audit of {} infrastructure",
                        category.to_lowercase()
                    ),
                    "Allocate emergency budget for immediate fixes".to_string(),
                    "Develop long-term improvement plan".to_string(),
                    "Establish regular maintenance schedule".to_string(),
                    "Create citizen reporting system".to_string(),
                ],
                priority: Priority::High,
                estimated_time: "3-6 months".to_string(),
                cost: Cost::High,
                responsible: vec![
                    "City Council".to_string(),
                    "Department Heads".to_string(),
                    "Budget Committee".to_string(),
                ],
                resources: vec![
                    "City Budget".to_string(),
                    "Infrastructure Assessment".to_string(),
                    "Citizen Engagement Platform".to_string(),
                ],
            });
        }
    }

    if let Some((district, count)) = top_entry(&district_counts) {
        if count > DISTRICT_FOCUS_THRESHOLD {
            solutions.push(Solution {
                id: "district_focus".to_string(),
                title: format!("{district} District Revitalization Program"),
                description: format!("Focused improvement program for {district} district"),
                steps: [
                    "Establish district task force",
                    "Conduct community needs assessment",
                    "Prioritize most critical issues",
                    "Implement quick wins for immediate impact",
                    "Develop long-term district improvement plan",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                priority: Priority::High,
                estimated_time: "2-4 months".to_string(),
                cost: Cost::High,
                responsible: vec![
                    "District Council".to_string(),
                    "Community Leaders".to_string(),
                    "City Planning".to_string(),
                ],
                resources: vec![
                    "Community Engagement".to_string(),
                    "District Budget".to_string(),
                    "Planning Resources".to_string(),
                ],
            });
        }
    }

    solutions
}

/// Highest count; ties resolve to the alphabetically first key so output is
/// stable across runs.
fn top_entry<'a>(counts: &BTreeMap<&'a str, u32>) -> Option<(&'a str, u32)> {
    let mut best: Option<(&str, u32)> = None;
    for (&key, &count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((key, count));
        }
    }
    best
}

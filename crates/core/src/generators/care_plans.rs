//! Goals, the care plan that references them, its activities and follow-up tasks.

use super::{GenerationContext, ResidentRef};
use crate::sampling::{fresh_id, pick_code};
use chrono::{Datelike, Duration};
use fhir::clinical::{CarePlan, CarePlanActivity, Goal, Task};
use fhir::datatypes::{CodeableConcept, Performer, Period};
use fhir::vocab::{ActivityStatus, CarePlanStatus, TaskIntent};
use fhir::Record;
use rand::seq::SliceRandom;
use rand::Rng;

/// A care plan together with its activities, which are also embedded in the plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarePlanBundle {
    pub care_plan: Record<CarePlan>,
    pub activities: Vec<Record<CarePlanActivity>>,
}

/// One goal per catalog goal template.
pub fn generate_goals<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Goal>> {
    ctx.catalog
        .goals
        .iter()
        .map(|template| {
            let data = Goal {
                resident_id: resident.id.to_string(),
                lifecycle_status: template.lifecycle_status,
                category: template.category.clone(),
                priority: template.priority.clone(),
                description: template.description.clone(),
            };
            Record::new(fresh_id(rng), data)
        })
        .collect()
}

/// The resident's care plan.
///
/// References 2–3 of `goals` (fewer if fewer exist) and carries 3–5 distinct activity
/// templates, capped at the number of templates.
pub fn generate_care_plan<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    goals: &[Record<Goal>],
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> CarePlanBundle {
    let care_plan_id = fresh_id(rng);

    let goal_count = rng.gen_range(2..=3usize).min(goals.len());
    let goal_ids: Vec<String> = goals
        .choose_multiple(rng, goal_count)
        .map(Record::id_string)
        .collect();

    let templates = &ctx.catalog.activities;
    let activity_count = rng.gen_range(3..=5usize).min(templates.len());
    let chosen: Vec<_> = templates.choose_multiple(rng, activity_count).collect();

    let activities: Vec<Record<CarePlanActivity>> = chosen
        .into_iter()
        .map(|template| {
            let data = CarePlanActivity {
                careplan_id: care_plan_id.to_string(),
                code: CodeableConcept::from_coding(template.coding.clone()),
                status: ActivityStatus::Scheduled,
                timing: template.timing.clone(),
                performer: ctx.staff.pick(rng).clone(),
                staff_instructions: staff_instructions(&template.coding.display),
            };
            Record::new(fresh_id(rng), data)
        })
        .collect();

    let data = CarePlan {
        resident_id: resident.id.to_string(),
        status: CarePlanStatus::Active,
        title: format!("Personalized Care Plan - {}", ctx.window.end().year()),
        author_id: ctx.staff.pick_id(rng),
        created_date: ctx.window.full().random_instant(rng),
        goal_ids,
        activities: activities.clone(),
    };

    CarePlanBundle {
        care_plan: Record::new(care_plan_id, data),
        activities,
    }
}

/// 1–4 tasks against the care plan, each tied to one of its activities.
pub fn generate_tasks<R: Rng + ?Sized>(
    resident: &ResidentRef<'_>,
    bundle: &CarePlanBundle,
    ctx: &GenerationContext<'_>,
    rng: &mut R,
) -> Vec<Record<Task>> {
    let count = rng.gen_range(1..=4usize);
    (0..count)
        .map(|_| {
            let activity_code = bundle
                .activities
                .choose(rng)
                .and_then(|a| a.data.activity_code())
                .map(str::to_string);
            let notes = ctx.catalog.task_notes.for_code(activity_code.as_deref());
            let created = ctx.window.full().random_instant(rng);
            let performer = ctx.staff.pick(rng);

            let data = Task {
                resident_id: resident.id.to_string(),
                careplan_id: bundle.care_plan.id_string(),
                activity_code: activity_code.clone(),
                status: pick_code(rng),
                intent: TaskIntent::Order,
                priority: pick_code(rng),
                requested_period: Period::closed(
                    created,
                    created + Duration::days(rng.gen_range(1..=7)),
                ),
                execution_period: Period::open(created),
                performer: Performer {
                    id: performer.id.clone(),
                    name: performer.name.clone(),
                    period: Period::closed(
                        created,
                        created + Duration::minutes(rng.gen_range(10..=60)),
                    ),
                },
                notes: notes.to_string(),
                authored_on: created,
                last_modified: created,
                do_not_perform: false,
                created_at: created,
                updated_at: created,
                viewed_at: created,
            };
            Record::new(fresh_id(rng), data)
        })
        .collect()
}

/// `Ensure resident comfort during <display before '(', lowercased>.`
fn staff_instructions(display: &str) -> String {
    let activity = display.split('(').next().unwrap_or(display).trim().to_lowercase();
    format!("Ensure resident comfort during {activity}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{resident, Fixture};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn instructions_drop_parenthesised_suffix() {
        assert_eq!(
            staff_instructions("Check skin integrity (daily)"),
            "Ensure resident comfort during check skin integrity."
        );
        assert_eq!(
            staff_instructions("Self-care assistance: bathing/hygiene"),
            "Ensure resident comfort during self-care assistance: bathing/hygiene."
        );
    }

    #[test]
    fn one_goal_per_template() {
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(2);
        let goals = generate_goals(&resident(), &fixture.ctx(), &mut rng);
        assert_eq!(goals.len(), fixture.catalog.goals.len());
        assert!(goals.iter().all(|g| g.data.resident_id == "r1"));
    }

    #[test]
    fn care_plan_links_goals_and_activities() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..30 {
            let goals = generate_goals(&resident(), &ctx, &mut rng);
            let bundle = generate_care_plan(&resident(), &goals, &ctx, &mut rng);
            let plan = &bundle.care_plan;

            let goal_ids: HashSet<String> = goals.iter().map(|g| g.id_string()).collect();
            assert!((2..=3).contains(&plan.data.goal_ids.len()));
            let unique: HashSet<&String> = plan.data.goal_ids.iter().collect();
            assert_eq!(unique.len(), plan.data.goal_ids.len());
            assert!(plan.data.goal_ids.iter().all(|id| goal_ids.contains(id)));

            assert!((3..=5).contains(&bundle.activities.len()));
            let displays: HashSet<&str> = bundle
                .activities
                .iter()
                .map(|a| a.data.code.coding[0].display.as_str())
                .collect();
            assert_eq!(displays.len(), bundle.activities.len());
            for activity in &bundle.activities {
                assert_eq!(activity.data.careplan_id, plan.id_string());
                assert_eq!(activity.data.status, ActivityStatus::Scheduled);
            }
            assert_eq!(plan.data.activities, bundle.activities);
            assert_eq!(plan.data.title, "Personalized Care Plan - 2024");
        }
    }

    #[test]
    fn goal_sample_is_capped_by_available_goals() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(8);
        let mut goals = generate_goals(&resident(), &ctx, &mut rng);
        goals.truncate(1);

        let bundle = generate_care_plan(&resident(), &goals, &ctx, &mut rng);
        assert_eq!(bundle.care_plan.data.goal_ids, vec![goals[0].id_string()]);
    }

    #[test]
    fn tasks_reference_the_plan_and_its_activities() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut rng = StdRng::seed_from_u64(10);

        for _ in 0..30 {
            let goals = generate_goals(&resident(), &ctx, &mut rng);
            let bundle = generate_care_plan(&resident(), &goals, &ctx, &mut rng);
            let tasks = generate_tasks(&resident(), &bundle, &ctx, &mut rng);
            let codes: HashSet<&str> = bundle
                .activities
                .iter()
                .filter_map(|a| a.data.activity_code())
                .collect();

            assert!((1..=4).contains(&tasks.len()));
            for task in &tasks {
                let data = &task.data;
                assert_eq!(data.careplan_id, bundle.care_plan.id_string());
                assert_eq!(data.intent, TaskIntent::Order);
                assert!(data.execution_period.end.is_none());
                match data.activity_code.as_deref() {
                    Some(code) => {
                        assert!(codes.contains(code));
                        assert_eq!(data.notes, fixture.catalog.task_notes.for_code(Some(code)));
                    }
                    None => assert_eq!(data.notes, "General follow-up required"),
                }
            }
        }
    }
}

//! When steps for weld job lifecycle BDD scenarios.

use super::world::{WeldJobWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use weldtrack::weld_job::{domain::WeldJobDetails, services::RegisterWeldJobRequest};

#[when(r#"the machine reports weld details with welder "{welder}""#)]
fn machine_reports(world: &mut WeldJobWorld, welder: String) -> Result<(), eyre::Report> {
    let device = world.device()?;
    let request = RegisterWeldJobRequest::new(device.as_str()).with_details(WeldJobDetails {
        welder_name: Some(welder),
        ..WeldJobDetails::default()
    });
    let outcome = run_async(world.service.register(request)).wrap_err("register weld job")?;
    world.previous_outcome = world.last_outcome.replace(outcome);
    Ok(())
}

#[when("the machine signals completion")]
fn machine_signals_completion(world: &mut WeldJobWorld) -> Result<(), eyre::Report> {
    let device = world.device()?;
    let completed = run_async(world.service.complete(&device)).wrap_err("complete weld job")?;
    if completed.is_some() {
        world.closed_business_id = world
            .last_outcome
            .as_ref()
            .map(|outcome| outcome.business_id.clone());
    }
    world.completion_result = Some(completed);
    Ok(())
}

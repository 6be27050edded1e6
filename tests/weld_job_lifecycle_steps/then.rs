//! Then steps for weld job lifecycle BDD scenarios.

use super::world::{WeldJobWorld, run_async};
use rstest_bdd_macros::then;
use weldtrack::weld_job::{
    domain::{BusinessId, LastJobStatus},
    services::RegistrationDisposition,
};

#[then("a new job is opened")]
fn new_job_opened(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    let outcome = world.last_outcome()?;
    if outcome.disposition != RegistrationDisposition::Created {
        return Err(eyre::eyre!(
            "expected a created job, got {:?}",
            outcome.disposition
        ));
    }
    Ok(())
}

#[then("the open job is resumed")]
fn open_job_resumed(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    let outcome = world.last_outcome()?;
    if outcome.disposition != RegistrationDisposition::Resumed {
        return Err(eyre::eyre!(
            "expected a resumed job, got {:?}",
            outcome.disposition
        ));
    }
    Ok(())
}

#[then("the job has a five character business identifier")]
fn five_character_business_id(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    let business_id = world.last_outcome()?.business_id.as_str();
    if business_id.len() != BusinessId::LENGTH
        || !business_id.chars().all(|ch| ch.is_ascii_uppercase())
    {
        return Err(eyre::eyre!("unexpected business identifier {business_id}"));
    }
    Ok(())
}

#[then("the business identifier is unchanged")]
fn business_id_unchanged(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    let previous = world
        .previous_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing earlier registration"))?;
    let current = world.last_outcome()?;
    if previous.business_id != current.business_id || previous.sequence_id != current.sequence_id
    {
        return Err(eyre::eyre!(
            "expected {} on record {}, found {} on record {}",
            previous.business_id,
            previous.sequence_id,
            current.business_id,
            current.sequence_id
        ));
    }
    Ok(())
}

#[then(r#"the stored welder is "{welder}""#)]
fn stored_welder_is(world: &WeldJobWorld, welder: String) -> Result<(), eyre::Report> {
    let sequence_id = world.last_outcome()?.sequence_id;
    let record = run_async(world.service.find(sequence_id))?
        .ok_or_else(|| eyre::eyre!("record {sequence_id} missing"))?;
    if record.details().welder_name.as_deref() != Some(welder.as_str()) {
        return Err(eyre::eyre!(
            "expected welder {welder}, found {:?}",
            record.details().welder_name
        ));
    }
    Ok(())
}

#[then("the job is closed")]
fn job_closed(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    let expected = world.last_outcome()?.sequence_id;
    match world.completion_result {
        Some(Some(closed)) if closed == expected => Ok(()),
        other => Err(eyre::eyre!("expected record {expected} closed, got {other:?}")),
    }
}

#[then("no job is closed")]
fn no_job_closed(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    match world.completion_result {
        Some(None) => Ok(()),
        other => Err(eyre::eyre!("expected nothing closed, got {other:?}")),
    }
}

#[then(r#"the last job status for the machine is "{status}""#)]
fn last_job_status_is(world: &WeldJobWorld, status: String) -> Result<(), eyre::Report> {
    let expected = match status.as_str() {
        "open" => LastJobStatus::Open,
        "completed" => LastJobStatus::Completed,
        "none" => LastJobStatus::NoRecord,
        other => return Err(eyre::eyre!("unknown status in scenario: {other}")),
    };
    let device = world.device()?;
    let actual = run_async(world.service.last_job_status(&device))?;
    if actual != expected {
        return Err(eyre::eyre!("expected {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("the business identifier differs from the closed job")]
fn business_id_differs(world: &WeldJobWorld) -> Result<(), eyre::Report> {
    let closed = world
        .closed_business_id
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no job was closed in this scenario"))?;
    let current = &world.last_outcome()?.business_id;
    if closed == current {
        return Err(eyre::eyre!("business identifier {current} was reused"));
    }
    Ok(())
}

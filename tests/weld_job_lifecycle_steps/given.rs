//! Given steps for weld job lifecycle BDD scenarios.

use super::world::{WeldJobWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use weldtrack::weld_job::{
    domain::{DeviceId, WeldJobDetails},
    services::RegisterWeldJobRequest,
};

#[given(r#"a welding machine "{device_id}""#)]
fn welding_machine(world: &mut WeldJobWorld, device_id: String) -> Result<(), eyre::Report> {
    world.device_id = Some(DeviceId::new(device_id).wrap_err("parse scenario device id")?);
    Ok(())
}

#[given(r#"the machine has reported weld details with welder "{welder}""#)]
fn machine_has_reported(world: &mut WeldJobWorld, welder: String) -> Result<(), eyre::Report> {
    let device = world.device()?;
    let request = RegisterWeldJobRequest::new(device.as_str()).with_details(WeldJobDetails {
        welder_name: Some(welder),
        ..WeldJobDetails::default()
    });
    let outcome =
        run_async(world.service.register(request)).wrap_err("register job in scenario setup")?;
    world.last_outcome = Some(outcome);
    Ok(())
}

mod common;

use std::path::PathBuf;

use common::{fake_licmgr, FakeRunner, CODE};

use cristie::credentials::Credentials;
use cristie::errors::CristieError;
use cristie::licmgr::{self, ActivationRequest, Activator, CommandOutput, LicenseParams, LicenseStatus};
use cristie::module::parse_params;
use cristie::product::Product;

fn trial() -> CommandOutput {
    CommandOutput::success("CBMR: Trial licence (29 days remaining)\n")
}

fn full() -> CommandOutput {
    CommandOutput::success("CBMR: Full licence\n")
}

#[tokio::test]
async fn offline_activation_trial_to_full_is_a_change() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial(), CommandOutput::success(""), full()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let request = ActivationRequest::Offline {
        activation_code: CODE.to_string(),
    };
    let result = activator.activate(&request).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.status_before, LicenseStatus::Trial);
    assert_eq!(result.status_after, LicenseStatus::Full);
    assert_eq!(result.msg, "Successfully licensed CBMR");

    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], vec!["-p", "CBMR"]);
    assert_eq!(calls[1], vec!["-p", "cbmr", "--act", CODE]);
    assert_eq!(calls[2], vec!["-p", "CBMR"]);
}

#[tokio::test]
async fn offline_dispatch_never_runs_online_flags() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial(), CommandOutput::success(""), trial()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let request = ActivationRequest::from_fields(None, None, None, Some(CODE)).unwrap();
    let result = activator.activate(&request).await.unwrap();

    assert!(!result.changed);
    let flags = runner.flags();
    assert!(!flags.iter().any(|f| f == "--cid" || f == "--cred"));
    assert!(flags.iter().any(|f| f == "--act"));
}

#[tokio::test]
async fn online_activation_runs_cid_before_cred() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![
        trial(),
        CommandOutput::success("contract registered"),
        CommandOutput::success("credentials stored"),
        full(),
    ]);
    let activator = Activator::new(&runner, exe.path(), Product::Cobmr);

    let request = ActivationRequest::from_fields(
        Some("ops@example.com"),
        Some("s3cret"),
        Some(CODE),
        None,
    )
    .unwrap();
    let result = activator.activate(&request).await.unwrap();

    assert!(result.changed);
    let calls = runner.calls();
    assert_eq!(calls[1], vec!["-p", "COBMR", "--cid", CODE]);
    assert_eq!(calls[2], vec!["-p", "COBMR", "--cred", "ops@example.com,s3cret"]);
    assert_eq!(runner.flags(), vec!["--cid", "--cred"]);
}

#[tokio::test]
async fn online_validation_happens_before_any_process_call() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let bad_email = activator
        .activate_online(CODE, &Credentials::new("not-an-email", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(bad_email, CristieError::Validation(_)));

    let bad_contract = activator
        .activate_online("ABC-123", &Credentials::new("ops@example.com", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(bad_contract, CristieError::Validation(ref e) if e.field == "contract_code"));

    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn invalid_activation_code_runs_nothing() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let err = activator.activate_offline("1234-5678").await.unwrap_err();

    assert!(matches!(err, CristieError::Validation(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn missing_licmgr_fails_before_any_call() {
    let runner = FakeRunner::new(vec![trial()]);
    let path = PathBuf::from("/definitely/not/here/licmgr");
    let activator = Activator::new(&runner, &path, Product::Cbmr);

    let err = activator.get_license_status().await.unwrap_err();

    assert!(matches!(err, CristieError::LicenseManagerMissing(ref p) if *p == path));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn non_zero_exit_is_fatal_and_surfaces_output() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![
        trial(),
        CommandOutput::failure(4, "", "activation code rejected"),
    ]);
    let activator = Activator::new(&runner, exe.path(), Product::Tbmr);

    let err = activator.activate_offline(CODE).await.unwrap_err();

    match &err {
        CristieError::LicenseManagerError {
            stage, exit_code, ..
        } => {
            assert_eq!(*stage, "applying the activation code");
            assert_eq!(*exit_code, Some(4));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.detail().unwrap().contains("activation code rejected"));
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn failing_cid_stops_before_cred() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial(), CommandOutput::failure(1, "bad contract", "")]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let result = activator
        .activate_online(CODE, &Credentials::new("ops@example.com", "pw"))
        .await;

    assert!(result.is_err());
    assert_eq!(runner.flags(), vec!["--cid"]);
}

#[tokio::test]
async fn unknown_status_is_an_error() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![CommandOutput::success("Product not installed")]);
    let activator = Activator::new(&runner, exe.path(), Product::Abmr);

    let err = activator.get_license_status().await.unwrap_err();

    assert!(matches!(err, CristieError::UnknownLicenceStatus { ref stdout } if stdout == "Product not installed"));
}

#[tokio::test]
async fn full_status_is_distinct_from_trial() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![full()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    assert_eq!(activator.get_license_status().await.unwrap(), LicenseStatus::Full);
}

#[tokio::test]
async fn module_rejects_credentials_without_contract() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let params: LicenseParams = parse_params(
        r#"{"product": "cbmr", "username": "ops@example.com", "password": "pw"}"#,
    )
    .unwrap();
    let err = licmgr::license(&activator, &params).await.unwrap_err();

    assert!(matches!(err, CristieError::ContractCodeMissing));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn module_reports_ambiguous_request() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let params: LicenseParams = parse_params(r#"{"product": "cbmr", "act_code": ""}"#).unwrap();
    let err = licmgr::license(&activator, &params).await.unwrap_err();

    assert!(matches!(err, CristieError::ActivationTypeAmbiguous));
}

#[tokio::test]
async fn module_accepts_activation_code_alias() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial(), CommandOutput::success(""), full()]);
    let activator = Activator::new(&runner, exe.path(), Product::Cbmr);

    let params: LicenseParams = parse_params(&format!(
        r#"{{"product": "CBMR", "activation_code": "{CODE}", "request_sig": true}}"#
    ))
    .unwrap();
    let resp = licmgr::license(&activator, &params).await.unwrap();

    assert!(resp.changed);
    assert!(!resp.failed);
    assert_eq!(resp.msg, "Successfully licensed CBMR");
    let meta = resp.meta.unwrap();
    assert_eq!(meta["status_before"], "Trial");
    assert_eq!(meta["status_after"], "Full");
    assert_eq!(meta["request_sig"], true);
}

#[tokio::test]
async fn success_message_uses_canonical_product_name() {
    let exe = fake_licmgr();
    let runner = FakeRunner::new(vec![trial(), CommandOutput::success(""), full()]);
    let params: LicenseParams =
        parse_params(&format!(r#"{{"product": "cobmr", "act_code": "{CODE}"}}"#)).unwrap();
    let activator = Activator::new(&runner, exe.path(), params.product);

    let resp = licmgr::license(&activator, &params).await.unwrap();

    assert_eq!(resp.msg, "Successfully licensed CoBMR");
    assert_eq!(runner.calls()[1], vec!["-p", "cobmr", "--act", CODE]);
}

mod common;

use carmin::models::ExecutionStatus;
use carmin::types::{ExecutionId, PipelineId};
use common::MockVip;
use rstest::*;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

fn execution(status: &str) -> Value {
    json!({
        "identifier": "workflow-abc",
        "name": "my execution",
        "pipelineIdentifier": "CQUEST/0.3",
        "status": status,
        "inputValues": {"input": "/vip/Home/image.nii"},
        "startDate": 1530000000000i64
    })
}

fn mount_execution(vip: &MockVip, status: &str) {
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions/workflow-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(execution(status))),
    );
}

fn exec_id() -> ExecutionId {
    ExecutionId::new("workflow-abc".to_string())
}

#[test]
fn test_list_executions() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([execution("Running"), execution("Finished")])),
            ),
    );
    let executions = vip.client().list_executions().unwrap();
    assert_eq!(executions.len(), 2);
    assert_eq!(executions[1].status, ExecutionStatus::Finished);
}

#[rstest]
#[case("42", 42)]
#[case("0", 0)]
#[case("7\n", 7)]
fn test_count_executions(#[case] body: &str, #[case] expected: u64) {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions/count"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body)),
    );
    assert_eq!(vip.client().count_executions().unwrap(), expected);
}

#[test]
fn test_count_executions_garbage() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions/count"))
            .respond_with(ResponseTemplate::new(200).set_body_string("many")),
    );
    assert!(matches!(
        vip.client().count_executions().unwrap_err(),
        carmin::CarminError::UnexpectedResponse(_)
    ));
}

#[test]
fn test_init_exec() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("POST"))
            .and(path("/rest/executions"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "name": "segmentation",
                "pipelineIdentifier": "CQUEST/0.3",
                "inputValues": {"input": "/vip/Home/image.nii", "iterations": 3}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(execution("Initializing")))
            .expect(1),
    );
    let inputs = Map::from_iter([
        ("input".to_string(), json!("/vip/Home/image.nii")),
        ("iterations".to_string(), json!(3)),
    ]);
    let id = vip
        .client()
        .init_exec(&PipelineId::new("CQUEST/0.3".to_string()), "segmentation", &inputs)
        .unwrap();
    assert_eq!(id, exec_id());
}

#[test]
fn test_init_exec_default() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("POST"))
            .and(path("/rest/executions"))
            .and(body_json(json!({
                "name": "default",
                "pipelineIdentifier": "CQUEST/0.3",
                "inputValues": {}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(execution("Initializing")))
            .expect(1),
    );
    let id = vip
        .client()
        .init_exec_default(&PipelineId::new("CQUEST/0.3".to_string()))
        .unwrap();
    assert_eq!(id.as_str(), "workflow-abc");
}

#[test]
fn test_execution_info() {
    let vip = MockVip::start();
    mount_execution(&vip, "Running");
    let info = vip.client().execution_info(&exec_id()).unwrap();
    assert_eq!(info.identifier, exec_id());
    assert_eq!(info.name.as_deref(), Some("my execution"));
    assert_eq!(info.input_values["input"], "/vip/Home/image.nii");
}

#[rstest]
#[case("Running", true)]
#[case("RUNNING", false)]
#[case("running", false)]
#[case("Finished", false)]
#[case("ExecutionFailed", false)]
#[case("Initializing", false)]
#[case("SomethingNew", false)]
fn test_is_running(#[case] status: &str, #[case] expected: bool) {
    let vip = MockVip::start();
    mount_execution(&vip, status);
    assert_eq!(vip.client().is_running(&exec_id()).unwrap(), expected);
}

#[test]
fn test_stdout_and_stderr() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions/workflow-abc/stdout"))
            .respond_with(ResponseTemplate::new(200).set_body_string("step 1\nstep 2\n")),
    );
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions/workflow-abc/stderr"))
            .respond_with(ResponseTemplate::new(200).set_body_string("")),
    );
    let client = vip.client();
    assert_eq!(client.execution_stdout(&exec_id()).unwrap(), "step 1\nstep 2\n");
    assert_eq!(client.execution_stderr(&exec_id()).unwrap(), "");
}

#[test]
fn test_execution_results() {
    let vip = MockVip::start();
    let results = json!([{"platformPath": "/vip/Home/results/out.txt", "isDirectory": false}]);
    vip.mount(
        Mock::given(method("GET"))
            .and(path("/rest/executions/workflow-abc/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(results.clone())),
    );
    assert_eq!(vip.client().execution_results(&exec_id()).unwrap(), results);
}

#[test]
fn test_kill_execution() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("DELETE"))
            .and(path("/rest/executions/workflow-abc"))
            .and(query_param_is_missing("deleteFiles"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1),
    );
    assert!(vip.client().kill_execution(&exec_id(), false).unwrap());
}

#[test]
fn test_kill_execution_delete_files() {
    let vip = MockVip::start();
    vip.mount(
        Mock::given(method("DELETE"))
            .and(path("/rest/executions/workflow-abc"))
            .and(query_param("deleteFiles", "true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1),
    );
    assert!(vip.client().kill_execution(&exec_id(), true).unwrap());
}

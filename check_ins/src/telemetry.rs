use crate::Result;

const API_METRIC: &str = concat!(env!("CARGO_PKG_NAME"), "-", "api-request");

pub const LIST_DURATION: &str = "check_ins_list_duration";
pub const GET_DURATION: &str = "check_ins_get_duration";
pub const CREATE_DURATION: &str = "check_ins_create_duration";
pub const UPDATE_DURATION: &str = "check_ins_update_duration";
pub const DELETE_DURATION: &str = "check_ins_delete_duration";

pub fn describe_metrics() {
    metrics::describe_counter!(API_METRIC, "Check-in API requests by operation and outcome");
    metrics::describe_histogram!(LIST_DURATION, "Duration of listing a page of check-ins");
    metrics::describe_histogram!(GET_DURATION, "Duration of fetching a single check-in");
    metrics::describe_histogram!(CREATE_DURATION, "Duration of creating a check-in");
    metrics::describe_histogram!(UPDATE_DURATION, "Duration of updating a check-in");
    metrics::describe_histogram!(DELETE_DURATION, "Duration of deleting a check-in");
}

pub fn count_request<T>(op: &'static str, result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.outcome(),
    };
    count_outcome(op, outcome);
}

pub fn count_outcome(op: &'static str, outcome: &'static str) {
    metrics::counter!(API_METRIC, "op" => op, "outcome" => outcome).increment(1);
}

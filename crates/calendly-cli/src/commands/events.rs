//! Event type, scheduled event and invitee commands.

use calendly_api::{
    CalendlyClient, EventStatus, ListEventInvitees, ListEventTypes, ListEvents, Record,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::commands::user_or_me;
use crate::error::CliResult;

/// `calendly event-types [--user] [--all]`
pub fn event_types(client: &CalendlyClient, user: Option<String>, all: bool) -> CliResult<Value> {
    let user = user_or_me(client, user)?;
    if all {
        return Ok(records(client.get_all_event_types(&user)?));
    }
    Ok(client.list_event_types(&ListEventTypes::for_user(user))?)
}

/// `calendly events [--user] [--status] [--all]`
pub fn events(
    client: &CalendlyClient,
    user: Option<String>,
    status: Option<EventStatus>,
    all: bool,
) -> CliResult<Value> {
    let user = user_or_me(client, user)?;
    if all {
        let mut found = client.get_all_scheduled_events(&user)?;
        if let Some(status) = status {
            let wanted = serde_json::to_value(status)?;
            found.retain(|event| event.get("status") == Some(&wanted));
        }
        return Ok(records(found));
    }

    let mut params = ListEvents::for_user(user);
    if let Some(status) = status {
        params = params.with_status(status);
    }
    Ok(client.list_events(&params)?)
}

/// `calendly event <event>`
pub fn event(client: &CalendlyClient, event: &str) -> CliResult<Value> {
    Ok(client.get_event_details(event)?)
}

/// `calendly invitees <event> [--all]`
pub fn invitees(client: &CalendlyClient, event: &str, all: bool) -> CliResult<Value> {
    if all {
        return Ok(records(client.get_all_event_invitees(event)?));
    }
    Ok(client.list_event_invitees(event, &ListEventInvitees::default())?)
}

/// `calendly scheduling-url <event> [--user]`
pub fn scheduling_url(
    client: &CalendlyClient,
    event: &str,
    user: Option<String>,
) -> CliResult<Value> {
    let user = user_or_me(client, user)?;
    let url = client.resolve_scheduling_url(event, &user)?;
    debug!(found = url.is_some(), "scheduling url lookup finished");
    Ok(json!({ "event": event, "scheduling_url": url }))
}

fn records(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{StubTransport, client};

    const USER: &str = "https://api.calendly.com/users/U1";
    const NEXT: &str = "https://api.calendly.com/scheduled_events?page_token=P2";

    #[test]
    fn event_types_single_page_with_explicit_user() {
        let stub = StubTransport::with(vec![(
            200,
            json!({"collection": [{"uri": "ET1"}], "pagination": {"next_page": NEXT}}),
        )]);

        let body = event_types(&client(&stub), Some(USER.into()), false).unwrap();
        assert_eq!(body["collection"][0]["uri"], "ET1");

        let sent = stub.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, Some(json!({"count": 20, "user": USER})));
    }

    #[test]
    fn events_all_filters_status() {
        let stub = StubTransport::with(vec![
            (
                200,
                json!({
                    "collection": [
                        {"uri": "E1", "status": "active"},
                        {"uri": "E2", "status": "canceled"}
                    ],
                    "pagination": {"next_page": NEXT}
                }),
            ),
            (
                200,
                json!({"collection": [{"uri": "E3", "status": "active"}], "pagination": {}}),
            ),
        ]);

        let body = events(
            &client(&stub),
            Some(USER.into()),
            Some(EventStatus::Active),
            true,
        )
        .unwrap();
        assert_eq!(body, json!([
            {"uri": "E1", "status": "active"},
            {"uri": "E3", "status": "active"}
        ]));
        assert_eq!(stub.requests()[1].url, NEXT);
    }

    #[test]
    fn events_single_page_sends_status() {
        let stub = StubTransport::with(vec![(200, json!({"collection": [], "pagination": {}}))]);

        events(&client(&stub), Some(USER.into()), Some(EventStatus::Canceled), false).unwrap();
        assert_eq!(
            stub.requests()[0].body,
            Some(json!({"count": 20, "user": USER, "status": "canceled"}))
        );
    }

    #[test]
    fn scheduling_url_resolves_me_first() {
        let target = "https://api.calendly.com/event_types/ET9";
        let stub = StubTransport::with(vec![
            (200, json!({"resource": {"uri": USER}})),
            (200, json!({"resource": {"event_type": target}})),
            (
                200,
                json!({
                    "collection": [{"uri": target, "scheduling_url": "https://calendly.com/u/30min"}],
                    "pagination": {"next_page": null}
                }),
            ),
        ]);

        let body = scheduling_url(&client(&stub), "EV1", None).unwrap();
        assert_eq!(
            body,
            json!({"event": "EV1", "scheduling_url": "https://calendly.com/u/30min"})
        );

        let sent = stub.requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].url, "https://api.calendly.com/scheduled_events/EV1");
        assert_eq!(sent[2].body, Some(json!({"count": 20, "user": USER})));
    }

    #[test]
    fn invitees_single_page() {
        let stub = StubTransport::with(vec![(200, json!({"collection": [{"email": "a@b.c"}]}))]);

        let body = invitees(&client(&stub), "EV1", false).unwrap();
        assert_eq!(body["collection"][0]["email"], "a@b.c");
        assert_eq!(
            stub.requests()[0].url,
            "https://api.calendly.com/scheduled_events/EV1/invitees"
        );
    }
}

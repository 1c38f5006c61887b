//! Small helpers translating pipeline outcomes into wire events,
//! shared by every trading route handler.

use bigdecimal::BigDecimal;
use booms_core::social::ActionOutcome;
use booms_events::{BoomsEvent, BoomsEventBody, EventBus, Topic};

pub fn publish_balance_update(
    events: &EventBus,
    user_id: i64,
    real_available: BigDecimal,
    virtual_balance: BigDecimal,
) {
    events.publish(
        Topic::User(user_id),
        BoomsEvent::new(BoomsEventBody::BalanceUpdate { user_id, real_available, virtual_balance }),
    );
}

pub fn publish_social_outcome(
    events: &EventBus,
    boom_id: i64,
    market_value: BigDecimal,
    applied_micro_value: BigDecimal,
    outcome: &ActionOutcome,
) {
    events.publish(
        Topic::Boom(boom_id),
        BoomsEvent::new(BoomsEventBody::SocialValueUpdate {
            boom_id,
            market_value,
            applied_micro_value,
        }),
    );
    if let Some(event) = outcome.event {
        events.publish(
            Topic::Boom(boom_id),
            BoomsEvent::new(BoomsEventBody::SocialEvent { boom_id, kind: format!("{event:?}").to_lowercase() }),
        );
    }
}

pub fn publish_treasury_update(events: &EventBus, balance: BigDecimal, total_fees_collected: BigDecimal) {
    events.publish(
        Topic::Treasury,
        BoomsEvent::new(BoomsEventBody::TreasuryUpdate { balance, total_fees_collected }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use booms_core::social::SocialEvent;

    fn outcome(event: Option<SocialEvent>) -> ActionOutcome {
        ActionOutcome {
            impact: BigDecimal::from(0),
            old_micro: BigDecimal::from(0),
            new_micro: BigDecimal::from(0),
            delta_micro: BigDecimal::from(0),
            paliers_crossed: 0,
            event,
        }
    }

    #[tokio::test]
    async fn social_outcome_without_an_event_publishes_only_the_value_update() {
        let events = EventBus::new();
        let mut receiver = events.subscribe(Topic::Boom(7));
        publish_social_outcome(&events, 7, BigDecimal::from(100), BigDecimal::from(5), &outcome(None));

        let first = receiver.recv().await.unwrap();
        assert!(matches!(first.body, BoomsEventBody::SocialValueUpdate { boom_id: 7, .. }));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn social_outcome_with_an_event_publishes_both_messages() {
        let events = EventBus::new();
        let mut receiver = events.subscribe(Topic::Boom(7));
        publish_social_outcome(
            &events,
            7,
            BigDecimal::from(100),
            BigDecimal::from(5),
            &outcome(Some(SocialEvent::Viral)),
        );

        let first = receiver.recv().await.unwrap();
        assert!(matches!(first.body, BoomsEventBody::SocialValueUpdate { .. }));
        let second = receiver.recv().await.unwrap();
        match second.body {
            BoomsEventBody::SocialEvent { boom_id, kind } => {
                assert_eq!(boom_id, 7);
                assert_eq!(kind, "viral");
            }
            other => panic!("expected a SocialEvent body, got {other:?}"),
        }
    }
}

use medstock_core::Aggregate;

/// Execute an aggregate command deterministically (no IO).
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (pure, no mutation)
/// 2. **Evolve**: applies each event via `aggregate.apply(event)`
///
/// On rejection nothing is applied and the aggregate is left as it was. The
/// returned events are what the caller reports on (observer notification,
/// confirmation lines).
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_core::AggregateRoot;

    #[derive(Debug, Default)]
    struct Tally {
        id: u8,
        total: i64,
        version: u64,
    }

    impl AggregateRoot for Tally {
        type Id = u8;

        fn id(&self) -> &u8 {
            &self.id
        }

        fn version(&self) -> u64 {
            self.version
        }
    }

    impl Aggregate for Tally {
        type Command = i64;
        type Event = i64;
        type Error = &'static str;

        fn apply(&mut self, event: &i64) {
            self.total += event;
            self.version += 1;
        }

        fn handle(&self, command: &i64) -> Result<Vec<i64>, &'static str> {
            if self.total + command < 0 {
                return Err("negative");
            }
            Ok(vec![*command])
        }
    }

    #[test]
    fn applies_events_on_success() {
        let mut tally = Tally::default();
        let events = execute(&mut tally, &5).unwrap();
        assert_eq!(events, vec![5]);
        assert_eq!(tally.total, 5);
        assert_eq!(tally.version(), 1);
    }

    #[test]
    fn rejection_leaves_state_untouched() {
        let mut tally = Tally::default();
        execute(&mut tally, &2).unwrap();
        assert_eq!(execute(&mut tally, &-3), Err("negative"));
        assert_eq!(tally.total, 2);
        assert_eq!(tally.version(), 1);
    }
}

//! Balance simulator for Block Clicker.
//! Run with: cargo test simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use crate::calc::passive_income_per_sec;
    use crate::logic;
    use crate::state::*;

    /// What to purchase next.
    enum Purchase {
        Slow(ServiceId),
        Ban(ServiceId),
    }

    /// Clicks per second a human player is assumed to manage.
    const CLICKS_PER_SEC: f64 = 5.0;

    /// Tick length the simulated host runs at (ms).
    const STEP_MS: u64 = 100;

    /// Find the affordable purchase with the best ROI (lowest payback time).
    fn find_best_purchase(state: &GameState) -> Option<Purchase> {
        let mut best: Option<(f64, Purchase)> = None; // (payback_seconds, purchase)
        // Income per second with clicks folded in.
        let income = |s: &GameState| {
            passive_income_per_sec(s) + s.click_power * s.block_multiplier * CLICKS_PER_SEC
        };
        let current = income(state);

        for config in &state.service_configs {
            let progress = state.progress(&config.id).unwrap_or_default();
            if progress == ServiceProgress::None && state.score >= config.slow_cost {
                let gain = config.slow_effect * state.block_multiplier;
                if gain > 0.0 {
                    let payback = config.slow_cost / gain;
                    let dominated = best.as_ref().is_some_and(|(bp, _)| *bp <= payback);
                    if !dominated {
                        best = Some((payback, Purchase::Slow(config.id.clone())));
                    }
                }
            }
            if progress != ServiceProgress::Banned && state.score >= config.ban_cost {
                let gain = current * (config.ban_multiplier - 1.0);
                // Bans are the win condition: take them even at zero gain.
                let payback = if gain > 0.0 { config.ban_cost / gain } else { f64::MAX };
                let dominated = best.as_ref().is_some_and(|(bp, _)| *bp <= payback);
                if !dominated {
                    best = Some((payback, Purchase::Ban(config.id.clone())));
                }
            }
        }

        best.map(|(_, p)| p)
    }

    struct SimResult {
        seconds_to_max: Option<f64>,
        purchases: Vec<String>,
        state: GameState,
    }

    /// Play greedily until every service is banned or `max_seconds` pass.
    fn simulate(max_seconds: u64) -> SimResult {
        let mut state = create_initial_state(0);
        let mut purchases = Vec::new();
        let mut now = 0u64;
        let click_every = (1000.0 / CLICKS_PER_SEC) as u64;

        while now < max_seconds * 1000 {
            now += STEP_MS;
            state = logic::apply_tick(&state, now);
            if now % click_every == 0 {
                state = logic::apply_click(&state);
            }

            while let Some(purchase) = find_best_purchase(&state) {
                let (label, result) = match &purchase {
                    Purchase::Slow(id) => (format!("slow {id}"), logic::buy_slow(&state, id)),
                    Purchase::Ban(id) => (format!("ban {id}"), logic::buy_ban(&state, id)),
                };
                match result {
                    Ok(next) => {
                        purchases.push(format!("{:>7.1}s {label}", now as f64 / 1000.0));
                        state = next;
                    }
                    Err(reason) => panic!("{label} picked but rejected: {}", reason.code()),
                }
            }

            if state.max_unlocked {
                return SimResult {
                    seconds_to_max: Some(now as f64 / 1000.0),
                    purchases,
                    state,
                };
            }
        }

        SimResult {
            seconds_to_max: None,
            purchases,
            state,
        }
    }

    #[test]
    fn simulate_greedy() {
        let result = simulate(3_600);
        for line in &result.purchases {
            println!("{line}");
        }
        let secs = result
            .seconds_to_max
            .expect("greedy player should ban every service within an hour");
        println!("max unlocked after {secs:.1}s");

        assert_eq!(result.state.dissent_percent, 100);
        assert_eq!(result.state.banned_count, 4);
        assert_eq!(result.state.block_multiplier, 16.0);
        assert!(result.state.score >= 0.0);
        let bans = result.purchases.iter().filter(|p| p.contains(" ban ")).count();
        assert_eq!(bans, 4);
        assert!(result.purchases.len() <= 8);
    }

    #[test]
    fn simulate_click_only_early_game() {
        // Without buying anything, ten seconds of clicking buys the first slow.
        let mut state = create_initial_state(0);
        for _ in 0..10 {
            state = logic::apply_click(&state);
        }
        assert!(logic::buy_slow(&state, "telegram").is_ok());
    }
}

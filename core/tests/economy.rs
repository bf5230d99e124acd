//! Economy model tests: cost, affordability, response, single steps.

use triad_core::{
    agent::{Agent, AgentKind},
    economy::{apply_step, can_act, compute_cost, compute_response, quote},
    rng::StimulusRng,
};

const EPS: f64 = 1e-9;

/// Worked example: yang, affordable.
#[test]
fn yang_pays_distance_and_responds_with_tanh() {
    let mut yang = Agent::new(AgentKind::Yang, 10.0);

    let cost = compute_cost(&yang, 0.5, 5.0);
    assert_eq!(cost, 3.5);
    assert!(can_act(&yang, cost));

    let response = compute_response(&yang, 0.5, 5.0);
    assert!((response - 0.462_117_157_3).abs() < 1e-9, "response {response}");

    let outcome = apply_step(&mut yang, 0.5, 5.0);
    assert!(outcome.acted);
    assert_eq!(outcome.cost, 3.5);
    assert_eq!(yang.balance(), 6.5);
    assert_eq!(yang.history(), &[6.5]);
}

/// Worked example: yin, broke.
#[test]
fn broke_yin_skips_without_side_effects() {
    let mut yin = Agent::new(AgentKind::Yin, 2.0);

    let cost = compute_cost(&yin, 0.5, 5.0);
    assert_eq!(cost, 8.5);
    assert!(!can_act(&yin, cost));
    assert_eq!(compute_response(&yin, 0.5, 5.0), 0.0);

    let outcome = apply_step(&mut yin, 0.5, 5.0);
    assert!(!outcome.acted);
    assert_eq!(outcome.balance, 2.0);
    assert_eq!(yin.balance(), 2.0);
    assert!(yin.history().is_empty());
}

#[test]
fn cost_is_at_least_one_for_non_negative_rates() {
    let mut rng = StimulusRng::new(0xC057);
    let agents = [
        Agent::new(AgentKind::Yang, 100.0),
        Agent::new(AgentKind::Yin, 100.0),
        Agent::new(AgentKind::Swing, 100.0),
    ];

    for _ in 0..2_000 {
        let stimulus = rng.normal(0.0, 3.0);
        let rate = rng.next_f64() * 20.0;
        for agent in &agents {
            let cost = compute_cost(agent, stimulus, rate);
            assert!(cost >= 1.0, "cost {cost} < 1 at stimulus={stimulus} rate={rate}");
        }
    }
}

#[test]
fn stimulus_on_bias_costs_exactly_the_base_fee() {
    let yin = Agent::new(AgentKind::Yin, 5.0);
    assert_eq!(compute_cost(&yin, -1.0, 7.0), 1.0);

    let swing = Agent::new(AgentKind::Swing, 5.0);
    assert_eq!(compute_cost(&swing, 0.0, 100.0), 1.0);
}

#[test]
fn swing_never_responds() {
    let mut rng = StimulusRng::new(3);
    for _ in 0..500 {
        let balance = rng.next_f64() * 50.0;
        let stimulus = rng.normal(0.0, 1.0);
        let swing = Agent::new(AgentKind::Swing, balance);
        assert_eq!(compute_response(&swing, stimulus, 5.0), 0.0);
    }
}

#[test]
fn response_is_bounded_by_bias_magnitude() {
    let yang = Agent::new(AgentKind::Yang, 1e9);
    let yin = Agent::new(AgentKind::Yin, 1e9);

    for stimulus in [-50.0, -1.0, -0.1, 0.0, 0.1, 1.0, 50.0] {
        let up = compute_response(&yang, stimulus, 1.0);
        let down = compute_response(&yin, stimulus, 1.0);
        assert!(up.abs() <= 1.0);
        assert!((up + down).abs() < EPS, "yang and yin should mirror each other");
    }
}

#[test]
fn exact_balance_is_affordable() {
    let mut yang = Agent::new(AgentKind::Yang, 3.5);
    let outcome = apply_step(&mut yang, 0.5, 5.0);

    assert!(outcome.acted);
    assert_eq!(yang.balance(), 0.0);
    assert_eq!(yang.history(), &[0.0]);

    // Now broke for any stimulus.
    assert!(!apply_step(&mut yang, 1.0, 0.0).acted);
}

#[test]
fn custom_bias_drives_cost_and_response() {
    let agent = Agent::with_bias(AgentKind::Swing, 0.5, 10.0);

    assert!((compute_cost(&agent, 0.0, 2.0) - 2.0).abs() < EPS);
    let response = compute_response(&agent, 1.0, 2.0);
    assert!((response - 0.5 * 1.0_f64.tanh()).abs() < EPS);
}

#[test]
fn quote_reports_the_same_numbers_as_the_pure_functions() {
    let yin = Agent::new(AgentKind::Yin, 8.0);
    let q = quote(&yin, 0.5, 5.0);

    assert_eq!(q.agent, AgentKind::Yin);
    assert_eq!(q.bias, -1.0);
    assert_eq!(q.cost, 8.5);
    assert!(!q.can_act);
    assert_eq!(q.response, 0.0);
}

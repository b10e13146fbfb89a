//! End-to-end integration tests across all engines.
//!
//! A command flows left to right:
//! `SecurityGate` -> `RoutingGateway` -> `ConsensusEngine` ->
//! `SettlementPlanner` -> `RiskEngine` -> `LedgerStore`, with the
//! `ResilienceMonitor` watching for outages on the side.
//!
//! Each test drives the whole pipeline through one realistic scenario and
//! checks both the decision taken and what ended up in the ledger.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};
use quorumledger_consensus::{ConsensusEngine, VoteRegistry};
use quorumledger_gateway::{AccessDecision, RoutingGateway, SecurityGate};
use quorumledger_risk::{ResilienceMonitor, RiskEngine};
use quorumledger_settlement::{LedgerStore, SettlementPlanner, SettlementRecord, verify_balanced};
use quorumledger_types::*;
use rust_decimal::Decimal;

const TOKEN: &str = "tok_live_5f2c9a81d3e4";
const CLEARING: &str = "acct:clearing";

/// Helper: every engine built from one policy, plus the shared stores.
struct Pipeline {
    gate: SecurityGate,
    router: RoutingGateway,
    consensus: ConsensusEngine,
    votes: VoteRegistry,
    planner: SettlementPlanner,
    risk: RiskEngine,
    resilience: ResilienceMonitor,
    ledger: LedgerStore,
}

impl Pipeline {
    fn new(config: &PolicyConfig) -> Self {
        config.validate().expect("test policy must validate");
        Self {
            gate: SecurityGate::from_config(config),
            router: RoutingGateway::from_config(config),
            consensus: ConsensusEngine::from_config(config),
            votes: VoteRegistry::new(),
            planner: SettlementPlanner::new(),
            risk: RiskEngine::from_config(config),
            resilience: ResilienceMonitor::from_config(config),
            ledger: LedgerStore::new(),
        }
    }

    fn vote(&self, epoch: EpochId, ballots: &[(&str, bool)]) {
        for (node, approved) in ballots {
            self.votes
                .submit(QuorumVote::new(*node, epoch, *approved))
                .expect("vote should be recorded");
        }
    }

    /// Drive one window through risk gating and into the ledger.
    fn settle(
        &self,
        window: &SettlementWindow,
        payer: &str,
        amount_cents: i64,
        degraded: bool,
    ) -> (SettlementRecord, Result<RiskTier>) {
        let mut record = SettlementRecord::new(window.window_id.clone());
        record.advance(SettlementState::Allocated).unwrap();
        record.advance(SettlementState::Settling).unwrap();

        let score = self
            .risk
            .compute_risk_score(amount_cents, 0, Decimal::new(1, 1));
        let outcome = self
            .risk
            .check_commit(amount_cents, score, degraded)
            .and_then(|tier| {
                self.ledger.transfer(payer, CLEARING, amount_cents, "USD")?;
                Ok(tier)
            });

        let next = if outcome.is_ok() {
            SettlementState::Settled
        } else {
            SettlementState::Failed
        };
        record.advance(next).unwrap();
        (record, outcome)
    }
}

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 16, 0, 0).unwrap() + Duration::minutes(minute)
}

fn windows(count: i64) -> Vec<SettlementWindow> {
    (0..count)
        .map(|i| SettlementWindow::new(format!("win-{i}"), at(i * 15), at(i * 15 + 15), 1))
        .collect()
}

fn command(action: &str) -> Command {
    Command {
        command_id: format!("cmd-{action}"),
        region: "us-east".into(),
        action: action.into(),
        priority: 1,
        issued_at: at(0),
    }
}

// =============================================================================
// Test: authorized command settles every window across two batches
// =============================================================================
#[test]
fn e2e_settles_all_windows() {
    let pipeline = Pipeline::new(&PolicyConfig::default());
    let cmd = command("settle");

    // SecurityGate
    assert_eq!(
        pipeline.gate.authorize(TOKEN, "settler", 700_000),
        AccessDecision::Granted
    );

    // RoutingGateway
    let replicas: HashMap<NodeId, Decimal> = [("n1", 5), ("n2", 9), ("n3", 9)]
        .into_iter()
        .map(|(id, w)| (NodeId::from(id), Decimal::from(w)))
        .collect();
    let replica = pipeline.router.select_replica(&replicas, &HashSet::new());
    assert_eq!(replica, Some(NodeId::from("n2")));

    // ConsensusEngine
    let epoch = EpochId(1);
    pipeline.vote(epoch, &[("n1", true), ("n2", true), ("n3", true)]);
    let ballots = pipeline.votes.votes_for_epoch(epoch);
    pipeline.consensus.require_quorum(&ballots).unwrap();
    assert_eq!(pipeline.consensus.health(&ballots, 3), HealthStatus::Healthy);

    let nodes = vec![
        Node::new("n1", false),
        Node::new("n2", true),
        Node::new("n3", false),
    ];
    let leaders = quorumledger_consensus::eligible_leaders(&nodes);
    assert_eq!(leaders, vec![NodeId::from("n1"), NodeId::from("n3")]);

    // SettlementPlanner
    let pending = windows(3);
    let plan = pipeline.planner.plan(&pending, &leaders).unwrap();
    assert_eq!(plan.batch(0), vec!["win-0", "win-2"]);
    assert_eq!(plan.batch(1), vec!["win-1"]);
    assert_eq!(plan.leader_for(0), Some(&NodeId::from("n1")));

    // RiskEngine + LedgerStore
    for (i, window) in pending.iter().enumerate() {
        let payer = format!("acct:payer-{i}");
        let (record, outcome) = pipeline.settle(window, &payer, 700_000, false);
        assert_eq!(outcome.unwrap(), RiskTier::Low);
        assert_eq!(record.state(), SettlementState::Settled);
        assert_eq!(pipeline.ledger.balance(&payer, "USD").unwrap(), -700_000);
    }
    assert_eq!(pipeline.ledger.balance(CLEARING, "USD").unwrap(), 2_100_000);
    assert_eq!(pipeline.ledger.next_sequence(CLEARING).unwrap(), 4);
    assert_eq!(pipeline.ledger.len(), 6);

    // Everything the ledger holds nets to zero.
    let mut all: Vec<LedgerEntry> = pipeline.ledger.entries(CLEARING).unwrap();
    for i in 0..3 {
        all.extend(pipeline.ledger.entries(&format!("acct:payer-{i}")).unwrap());
    }
    verify_balanced(&all).unwrap();

    // Outbound envelope
    let event = Event::handled(Subsystem::Settlement, &cmd);
    assert_eq!(event.event_id, "settlement:cmd-settle");
    assert_eq!(event.idempotency_key, event.event_id);

    // ResilienceMonitor: a blip on one service is not worth paging anyone.
    assert!(!pipeline.resilience.should_notify(3, 1));
}

// =============================================================================
// Test: degraded cluster trips the breaker and nothing is written
// =============================================================================
#[test]
fn e2e_degraded_cluster_halts_commits() {
    let pipeline = Pipeline::new(&PolicyConfig::default());

    let epoch = EpochId(7);
    pipeline.vote(epoch, &[("n1", true), ("n2", false), ("n3", false)]);
    let ballots = pipeline.votes.votes_for_epoch(epoch);
    let health = pipeline.consensus.health(&ballots, 3);
    assert_eq!(health, HealthStatus::Critical);
    assert!(matches!(
        pipeline.consensus.require_quorum(&ballots),
        Err(QuorumLedgerError::QuorumNotReached { approved: 1, voters: 3 })
    ));

    let degraded = health != HealthStatus::Healthy;
    let window = &windows(1)[0];
    let (record, outcome) = pipeline.settle(window, "acct:payer", 10_000, degraded);
    assert!(matches!(
        outcome,
        Err(QuorumLedgerError::CircuitBreakerTripped { .. })
    ));
    assert_eq!(record.state(), SettlementState::Failed);
    assert!(pipeline.ledger.is_empty());
}

// =============================================================================
// Test: exposure above the margin-adjusted ceiling is refused
// =============================================================================
#[test]
fn e2e_exposure_ceiling_enforced() {
    let pipeline = Pipeline::new(&PolicyConfig::default());
    let window = &windows(1)[0];

    // 19.95M cents scores MEDIUM (42.9) and sits between the effective and
    // nominal MEDIUM ceilings.
    let (record, outcome) = pipeline.settle(window, "acct:whale", 19_950_000, false);
    let err = outcome.unwrap_err();
    assert!(
        matches!(err, QuorumLedgerError::ExposureLimitExceeded { limit_cents: 19_900_000, .. }),
        "Expected ExposureLimitExceeded, got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::PolicyDenied);
    assert_eq!(record.state(), SettlementState::Failed);
    assert_eq!(pipeline.ledger.balance("acct:whale", "USD").unwrap(), 0);
}

// =============================================================================
// Test: large amounts demand step-up, unknown roles are denied
// =============================================================================
#[test]
fn e2e_security_gate_blocks_before_anything_else() {
    let pipeline = Pipeline::new(&PolicyConfig::default());

    assert_eq!(
        pipeline.gate.authorize(TOKEN, "operator", 75_000),
        AccessDecision::StepUpRequired
    );
    assert_eq!(
        pipeline.gate.authorize(TOKEN, "intruder", 1),
        AccessDecision::Denied
    );
    assert_eq!(
        pipeline.gate.authorize("short", "admin", 1),
        AccessDecision::Denied
    );
    assert!(matches!(
        pipeline.gate.require_access(TOKEN, "operator", 75_000),
        Err(QuorumLedgerError::StepUpRequired { .. })
    ));
    assert!(pipeline.ledger.is_empty());
}

// =============================================================================
// Test: overlapping windows and leaderless clusters are not planned
// =============================================================================
#[test]
fn e2e_planner_refuses_bad_input() {
    let pipeline = Pipeline::new(&PolicyConfig::default());
    let mut pending = windows(2);
    pending.push(SettlementWindow::new("late", at(10), at(20), 5));

    let leaders = vec![NodeId::from("n1")];
    assert!(matches!(
        pipeline.planner.plan(&pending, &leaders),
        Err(QuorumLedgerError::OverlappingWindows)
    ));

    let all_degraded = vec![Node::new("n1", true), Node::new("n2", true)];
    assert!(matches!(
        pipeline.consensus.leader(&all_degraded),
        Err(QuorumLedgerError::NoEligibleLeader)
    ));
    let leaders = quorumledger_consensus::eligible_leaders(&all_degraded);
    assert!(matches!(
        pipeline.planner.plan(&windows(2), &leaders),
        Err(QuorumLedgerError::NoEligibleLeader)
    ));
}

// =============================================================================
// Test: a wide outage pages and its recovery estimate is the longest
// =============================================================================
#[test]
fn e2e_outage_escalation() {
    let pipeline = Pipeline::new(&PolicyConfig::default());
    let routes = vec![
        WeightedRoute::new("wire", Decimal::from(6)),
        WeightedRoute::new("ach", Decimal::from(3)),
        WeightedRoute::new("rtp", Decimal::from(1)),
    ];
    let down: HashSet<String> = ["wire".to_string(), "ach".to_string()].into();
    assert_eq!(
        pipeline.router.route_health(&routes, &down),
        HealthStatus::Critical
    );

    let tier = pipeline.resilience.outage_tier(90, 6);
    assert_eq!(tier, OutageTier::Critical);
    assert!(pipeline.resilience.should_notify(90, 6));
    let longest = OutageTier::ALL
        .iter()
        .map(|t| pipeline.resilience.recovery_time(*t))
        .max();
    assert_eq!(Some(pipeline.resilience.recovery_time(tier)), longest);

    // Remaining capacity spread over the surviving channel set.
    assert_eq!(pipeline.router.balanced_distribution(7, 3), vec![3, 2, 2]);
}

// =============================================================================
// Test: tightened policy from JSON changes the decisions
// =============================================================================
#[test]
fn e2e_policy_from_json() {
    let config = PolicyConfig::from_json_str(
        r#"{
            "consensus": { "quorum_threshold": "0.75" },
            "risk": { "breaker_threshold": "3" }
        }"#,
    )
    .unwrap();
    let pipeline = Pipeline::new(&config);

    let epoch = EpochId(3);
    pipeline.vote(
        epoch,
        &[("n1", true), ("n2", true), ("n3", false), ("n4", true)],
    );
    pipeline
        .consensus
        .require_quorum(&pipeline.votes.votes_for_epoch(epoch))
        .unwrap();
    pipeline.vote(EpochId(4), &[("n1", true), ("n2", true), ("n3", false)]);
    assert!(
        pipeline
            .consensus
            .require_quorum(&pipeline.votes.votes_for_epoch(EpochId(4)))
            .is_err()
    );

    // 2 * 0.7 + 30 * 0.1 = 4.4 > 3: breaker trips on score alone.
    let (_, outcome) = pipeline.settle(&windows(1)[0], "acct:payer", 700_000, false);
    assert!(matches!(
        outcome,
        Err(QuorumLedgerError::CircuitBreakerTripped { .. })
    ));
}

// =============================================================================
// Test: replayed vote submissions and ledger writes are harmless
// =============================================================================
#[test]
fn e2e_retries_are_idempotent_or_rejected() {
    let pipeline = Pipeline::new(&PolicyConfig::default());
    let vote = QuorumVote::new("n1", EpochId(9), true);
    pipeline.votes.submit(vote.clone()).unwrap();
    pipeline.votes.submit(vote).unwrap();
    assert_eq!(pipeline.votes.len(), 1);
    assert!(matches!(
        pipeline.votes.submit(QuorumVote::new("n1", EpochId(9), false)),
        Err(QuorumLedgerError::DuplicateVote { .. })
    ));

    let posted = pipeline
        .ledger
        .transfer("acct:payer", CLEARING, 1_000, "USD")
        .unwrap();
    for entry in posted {
        let err = pipeline.ledger.append_entry(entry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataIntegrityViolation);
    }
    assert_eq!(pipeline.ledger.len(), 2);
}

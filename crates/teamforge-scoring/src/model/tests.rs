use super::*;
use teamforge_test::{ivysaur, trio_roster};

fn sample_model() -> EvaluationModel {
    EvaluationModel::new("test-evaluation")
        .with_weight(Feature::Attack, 1)
        .with_weight(Feature::Defence, 1)
        .with_weight(Feature::Hp, 1)
        .with_weight(Feature::AttackCycleLengthInverted, 1500)
        .with_weight(Feature::AttackCycleDamage, 10)
        .with_weight(Feature::TypeVulnerability, 100)
        .with_attack_weight(AttackFeature::AttackCycleLengthInverted, 100)
        .with_attack_weight(AttackFeature::AttackCycleDamage, 1)
}

#[test]
fn test_score_is_exact() {
    let roster = trio_roster();
    let team = Team::from_roster(&roster, [0, 1, 2]).unwrap();
    assert_eq!(sample_model().score(&team), 1282.3441295546559);
}

#[test]
fn test_explain_breakdown() {
    let roster = trio_roster();
    let team = Team::from_roster(&roster, [0, 1, 2]).unwrap();
    let explanation = sample_model().explain(&team);

    let attack = explanation.get(Feature::Attack).unwrap();
    assert_eq!(attack.value, 280.0);
    assert_eq!(attack.weight, 1);
    assert_eq!(explanation.get(Feature::Defence).unwrap().value, 239.0);
    assert_eq!(explanation.get(Feature::Hp).unwrap().value, 277.0);
    assert_eq!(
        explanation
            .get(Feature::AttackCycleLengthInverted)
            .unwrap()
            .value,
        0.16955465587044535
    );
    assert_eq!(
        explanation.get(Feature::AttackCycleDamage).unwrap().value,
        23.201214574898785
    );
    let vulnerability = explanation.get(Feature::TypeVulnerability).unwrap();
    assert_eq!(vulnerability.value, 0.0);
    assert_eq!(vulnerability.weight, 100);
    assert_eq!(explanation.score(), 1282.3441295546559);
    assert_eq!(explanation.contributions().len(), Feature::COUNT);
}

#[test]
fn test_explain_ignores_constraint() {
    let roster = trio_roster();
    let team = Team::from_roster(&roster, [0, 1, 2]).unwrap();
    let model = sample_model().with_max_combat_power(900.0);
    assert!(!model.matches_constraints(&team));
    assert_eq!(model.explain(&team).score(), 1282.3441295546559);
}

#[test]
fn test_explain_serializes_flat() {
    let roster = trio_roster();
    let team = Team::from_roster(&roster, [0, 1, 2]).unwrap();
    let json = serde_json::to_value(sample_model().explain(&team)).unwrap();

    assert_eq!(json["attack"]["value"], 280.0);
    assert_eq!(json["attack"]["weight"], 1);
    assert_eq!(json["type-vulnerability"]["weight"], 100);
    assert_eq!(json["score"], 1282.3441295546559);
    assert_eq!(json.as_object().unwrap().len(), Feature::COUNT + 1);
}

#[test]
fn test_score_is_order_insensitive() {
    let roster = trio_roster();
    let model = sample_model();
    let a = model.score(&Team::from_roster(&roster, [0, 1, 2]).unwrap());
    let b = model.score(&Team::from_roster(&roster, [2, 1, 0]).unwrap());
    assert!((a - b).abs() < 1e-9);
}

#[test]
fn test_constraint_boundaries() {
    let roster = trio_roster();
    let team = Team::from_roster(&roster, [0, 1, 2]).unwrap();

    assert!(sample_model().matches_constraints(&team));
    assert!(sample_model()
        .with_max_combat_power(975.0)
        .matches_constraints(&team));
    assert!(!sample_model()
        .with_max_combat_power(974.0)
        .matches_constraints(&team));
    // No member fits under Charmander's 549.
    assert!(!sample_model()
        .with_max_combat_power(548.0)
        .matches_constraints(&team));
}

#[test]
fn test_zero_weights_score_zero() {
    let roster = trio_roster();
    let team = Team::from_roster(&roster, [0, 1, 2]).unwrap();
    assert_eq!(EvaluationModel::new("empty").score(&team), 0.0);
}

#[test]
fn test_attack_score() {
    assert_eq!(sample_model().attack_score(&ivysaur()), 16.346153846153847);
    assert_eq!(EvaluationModel::new("empty").attack_score(&ivysaur()), 0.0);
}

#[test]
fn test_table_round_trip() {
    let models = vec![
        sample_model().with_max_combat_power(1500.0),
        EvaluationModel::new("bare").with_weight(Feature::Hp, -2),
    ];
    let table = EvaluationModel::to_table(&models);
    assert_eq!(table.columns().len(), 1 + Feature::COUNT + 1 + AttackFeature::COUNT);
    assert_eq!(EvaluationModel::from_table(&table).unwrap(), models);
}

#[test]
fn test_from_row_defaults() {
    let table = Table::with_rows(
        [EVALUATION_NAME_COLUMN, "attack-weight"],
        vec![vec!["sparse".into(), Cell::from(3_i64)]],
    )
    .unwrap();
    let models = EvaluationModel::from_table(&table).unwrap();
    assert_eq!(models.len(), 1);
    let model = &models[0];
    assert_eq!(model.name(), "sparse");
    assert_eq!(model.weight(Feature::Attack), 3);
    assert_eq!(model.weight(Feature::Defence), 0);
    assert_eq!(model.max_combat_power(), None);
}

#[test]
fn test_from_row_rejects_fractional_weight() {
    let table = Table::with_rows(
        [EVALUATION_NAME_COLUMN, "hp-weight"],
        vec![vec!["frac".into(), Cell::from(1.5)]],
    )
    .unwrap();
    assert!(matches!(
        EvaluationModel::from_table(&table),
        Err(ScoringError::InvalidWeight { .. })
    ));
}

#[test]
fn test_from_row_requires_name() {
    let table = Table::with_rows(
        [EVALUATION_NAME_COLUMN, "hp-weight"],
        vec![vec![Cell::Empty, Cell::from(1_i64)]],
    )
    .unwrap();
    let err = EvaluationModel::from_table(&table).unwrap_err();
    assert_eq!(err, ScoringError::MissingModelName { row: 0 });
    assert_eq!(err.kind(), teamforge_core::ErrorKind::DataContract);
}

#[test]
fn test_text_weights_are_parsed() {
    let table = Table::with_rows(
        [EVALUATION_NAME_COLUMN, "defence-weight", MAX_CP_CONSTRAINT_COLUMN],
        vec![vec!["sheet".into(), "4".into(), "1500".into()]],
    )
    .unwrap();
    let model = &EvaluationModel::from_table(&table).unwrap()[0];
    assert_eq!(model.weight(Feature::Defence), 4);
    assert_eq!(model.max_combat_power(), Some(1500.0));
}

//! Full-lifecycle tests across the four escrow contracts: token sale,
//! milestone execution, regulator rating and rewards, refunds and payment
//! settlement, with value conservation checked at every phase.

use fund_ledger::{FundLedger, FundLedgerClient};
use milestone_escrow::{Error as EscrowError, MilestoneEscrow, MilestoneEscrowClient};
use project_registry::{Error as RegistryError, ProjectRegistry, ProjectRegistryClient};
use regulator_rating::{Error as RatingError, PollStage, RegulatorRating, RegulatorRatingClient};
use shared_types::{EntryKey, MilestoneState, Objective, ProjectId, ProjectState, ONE_WEEK};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token, vec, Address, BytesN, Env, Symbol, Vec,
};

const T0: u64 = 1_000_000;
const MILESTONE_LENGTH: u64 = 10 * ONE_WEEK;

struct TestContext {
    env: Env,
    owner: Address,
    purchaser1: Address,
    purchaser2: Address,
    value_token: Address,
    project_token: Address,
    fund_id: Address,
    fund: FundLedgerClient<'static>,
    registry: ProjectRegistryClient<'static>,
    escrow: MilestoneEscrowClient<'static>,
    rating: RegulatorRatingClient<'static>,
    project_id: ProjectId,
}

fn setup() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = T0);

    let admin = Address::generate(&env);
    let registry_auth = Address::generate(&env);
    let owner = Address::generate(&env);
    let purchaser1 = Address::generate(&env);
    let purchaser2 = Address::generate(&env);
    let oracle = Address::generate(&env);

    let value_token = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let project_token = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();

    let fund_id = env.register_contract(None, FundLedger);
    let registry_id = env.register_contract(None, ProjectRegistry);
    let escrow_id = env.register_contract(None, MilestoneEscrow);
    let rating_id = env.register_contract(None, RegulatorRating);

    let fund = FundLedgerClient::new(&env, &fund_id);
    let registry = ProjectRegistryClient::new(&env, &registry_id);
    let escrow = MilestoneEscrowClient::new(&env, &escrow_id);
    let rating = RegulatorRatingClient::new(&env, &rating_id);

    fund.initialize(&admin, &value_token);
    fund.add_operator(&registry_id);
    fund.add_operator(&escrow_id);
    fund.add_operator(&rating_id);

    registry.initialize(&admin, &registry_auth, &value_token, &fund_id, &escrow_id);
    escrow.initialize(&admin, &fund_id, &registry_id, &rating_id);
    rating.initialize(&admin, &oracle, &fund_id, &registry_id, &9_000);

    // purchasers funded in value currency, founder holds the token supply
    let value_asset = token::StellarAssetClient::new(&env, &value_token);
    value_asset.mint(&purchaser1, &20_000_000);
    value_asset.mint(&purchaser2, &1_000_000);
    let project_asset = token::StellarAssetClient::new(&env, &project_token);
    project_asset.mint(&owner, &100_000_000);

    let project_id: ProjectId = BytesN::from_array(&env, &[7u8; 32]);
    registry.register_project(&project_id, &owner);
    registry.accept_application(&project_id);
    registry.set_token_address(&project_id, &project_token);

    TestContext {
        env,
        owner,
        purchaser1,
        purchaser2,
        value_token,
        project_token,
        fund_id,
        fund,
        registry,
        escrow,
        rating,
        project_id,
    }
}

fn set_time(ctx: &TestContext, timestamp: u64) {
    ctx.env.ledger().with_mut(|li| li.timestamp = timestamp);
}

fn value_balance(ctx: &TestContext, who: &Address) -> i128 {
    token::Client::new(&ctx.env, &ctx.value_token).balance(who)
}

fn token_balance(ctx: &TestContext, who: &Address) -> i128 {
    token::Client::new(&ctx.env, &ctx.project_token).balance(who)
}

fn objective(ctx: &TestContext, id: &str, objective_type: &str, max_reward: i128) -> Objective {
    Objective {
        id: Symbol::new(&ctx.env, id),
        objective_type: Symbol::new(&ctx.env, objective_type),
        max_reward,
    }
}

/// Value currency held by the fund ledger must equal the sum of its value
/// entries at all times.
fn assert_ledger_conserved(ctx: &TestContext, milestone_count: u32, purchasers: &[&Address]) {
    let mut total = ctx
        .fund
        .balance(&EntryKey::ProjectBalance(ctx.project_id.clone()));
    total += ctx
        .fund
        .balance(&EntryKey::RegulatorReserve(ctx.project_id.clone()));
    for milestone_id in 1..=milestone_count {
        total += ctx
            .fund
            .balance(&EntryKey::MilestoneLocked(ctx.project_id.clone(), milestone_id));
        for purchaser in purchasers {
            total += ctx.fund.balance(&EntryKey::RefundLocked(
                ctx.project_id.clone(),
                milestone_id,
                (*purchaser).clone(),
            ));
        }
    }
    assert_eq!(value_balance(ctx, &ctx.fund_id), total);
}

#[test]
fn test_full_lifecycle_conserves_funds() {
    let ctx = setup();
    let reg1 = Address::generate(&ctx.env);
    let reg2 = Address::generate(&ctx.env);
    let reg3 = Address::generate(&ctx.env);

    // two milestones declared before the sale settles; reward caps 500 + 300
    let m1_objectives: Vec<Objective> = vec![
        &ctx.env,
        objective(&ctx, "obj_main", "tech", 300),
        objective(&ctx, "obj_side", "ops", 200),
    ];
    let m2_objectives: Vec<Objective> = vec![&ctx.env, objective(&ctx, "obj_final", "tech", 300)];
    assert_eq!(ctx.escrow.add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &m1_objectives), 1);
    assert_eq!(ctx.escrow.add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &m2_objectives), 2);
    assert_eq!(ctx.escrow.get_total_reward_cap(&ctx.project_id), 800);

    // ---- token sale: rate 5, two purchasers ----
    ctx.registry.start_token_sale(&ctx.project_id, &5, &60_000_000);
    ctx.registry.buy_tokens(&ctx.project_id, &ctx.purchaser1, &10_000_000);
    ctx.registry.buy_tokens(&ctx.project_id, &ctx.purchaser2, &500_000);
    assert_eq!(token_balance(&ctx, &ctx.purchaser1), 50_000_000);
    assert_eq!(token_balance(&ctx, &ctx.purchaser2), 2_500_000);
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    ctx.registry.finalize(&ctx.project_id);
    assert_eq!(ctx.registry.get_average_price(&ctx.project_id), 5);
    let sale = ctx.registry.get_sale_info(&ctx.project_id);
    assert!(sale.finalized);
    assert_eq!(sale.average_price, 5);
    assert_eq!(sale.total_sold, 52_500_000);
    assert_eq!(sale.total_received, 10_500_000);
    let (exists, state, uncommitted) = ctx.registry.get_project_info(&ctx.project_id);
    assert!(exists);
    assert_eq!(state, ProjectState::Milestone);
    assert_eq!(uncommitted, 10_499_200);
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::RegulatorReserve(ctx.project_id.clone())),
        800
    );
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    ctx.registry.withdraw_unsold_tokens(&ctx.project_id);
    assert_eq!(token_balance(&ctx, &ctx.owner), 47_500_000);

    // ---- milestone 1: activate, rate, vote, bid ----
    let end1 = T0 + MILESTONE_LENGTH;
    ctx.escrow
        .activate(&ctx.project_id, &1, &5_000_000, &T0, &(T0 + ONE_WEEK));
    assert_eq!(
        ctx.escrow.milestone_state(&ctx.project_id, &1),
        MilestoneState::InProgress
    );
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::MilestoneLocked(ctx.project_id.clone(), 1)),
        5_000_000
    );
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    ctx.escrow.start_rating_stage(&ctx.project_id, &1);
    let poll = ctx.rating.get_poll_info(&ctx.project_id, &1);
    assert_eq!(poll.price, 5);
    assert_eq!(poll.stage, PollStage::Bidding);
    assert_eq!(poll.bid_deadline, end1 - 3 * ONE_WEEK);
    ctx.rating
        .write_available_votes(&ctx.project_id, &1, &ctx.purchaser1, &300);
    let tech = Symbol::new(&ctx.env, "tech");
    ctx.rating
        .vote(&ctx.project_id, &1, &ctx.purchaser1, &reg1, &tech, &100);
    ctx.rating
        .vote(&ctx.project_id, &1, &ctx.purchaser1, &reg2, &tech, &200);

    let obj_main = Symbol::new(&ctx.env, "obj_main");
    let obj_side = Symbol::new(&ctx.env, "obj_side");
    ctx.rating.bid(&ctx.project_id, &1, &obj_main, &reg1);
    ctx.rating.bid(&ctx.project_id, &1, &obj_main, &reg2);
    ctx.rating.bid(&ctx.project_id, &1, &obj_side, &reg3);

    // ---- reward settlement after the bid deadline ----
    let deadline1 = end1 - 3 * ONE_WEEK;
    let early = ctx.rating.try_finalize_all_bids(&ctx.project_id, &1);
    assert_eq!(early, Err(Ok(RatingError::NotYetEligible)));
    set_time(&ctx, deadline1 + 1);
    ctx.rating.finalize_all_bids(&ctx.project_id, &1);

    // 300 cap split by weighted votes 500:1000
    assert_eq!(
        ctx.rating
            .get_regulation_rewards(&ctx.project_id, &1, &obj_main, &reg1),
        100
    );
    assert_eq!(
        ctx.rating
            .get_regulation_rewards(&ctx.project_id, &1, &obj_main, &reg2),
        200
    );
    // unvoted objective pays nothing
    assert_eq!(
        ctx.rating
            .get_regulation_rewards(&ctx.project_id, &1, &obj_side, &reg3),
        0
    );
    // this poll's tallies fold into standing reputation at 10%
    assert_eq!(ctx.rating.get_reputation(&reg1, &tech), 50);
    assert_eq!(ctx.rating.get_reputation(&reg2, &tech), 100);

    ctx.rating.withdraw_reward(&ctx.project_id, &1, &obj_main, &reg1);
    assert_eq!(value_balance(&ctx, &reg1), 100);
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::RegulatorReserve(ctx.project_id.clone())),
        700
    );
    let repeat = ctx
        .rating
        .try_withdraw_reward(&ctx.project_id, &1, &obj_main, &reg1);
    assert_eq!(repeat, Err(Ok(RatingError::AlreadyClaimed)));
    let empty = ctx
        .rating
        .try_withdraw_reward(&ctx.project_id, &1, &obj_side, &reg3);
    assert_eq!(empty, Err(Ok(RatingError::AlreadyClaimed)));
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    // ---- refund stage: final week of milestone 1 ----
    set_time(&ctx, end1 - ONE_WEEK);
    ctx.escrow.start_refund_stage(&ctx.project_id, &1);
    assert_eq!(
        ctx.escrow.milestone_state(&ctx.project_id, &1),
        MilestoneState::RefundPeriod
    );

    // 100,000 tokens back at average price 5 -> 20,000 value locked
    ctx.escrow
        .refund(&ctx.project_id, &1, &ctx.purchaser1, &100_000);
    assert_eq!(token_balance(&ctx, &ctx.purchaser1), 49_900_000);
    assert_eq!(
        ctx.fund.balance(&EntryKey::RefundLocked(
            ctx.project_id.clone(),
            1,
            ctx.purchaser1.clone()
        )),
        20_000
    );
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::MilestoneLocked(ctx.project_id.clone(), 1)),
        4_980_000
    );
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::RefundableTokens(ctx.project_id.clone())),
        100_000
    );
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    // locked until the milestone closes
    let early = ctx
        .escrow
        .try_refund_withdraw(&ctx.project_id, &1, &ctx.purchaser1);
    assert_eq!(early, Err(Ok(EscrowError::NotYetEligible)));

    // ---- milestone 1 closes ----
    set_time(&ctx, end1);
    assert_eq!(
        ctx.escrow.milestone_state(&ctx.project_id, &1),
        MilestoneState::Completion
    );
    ctx.escrow.founder_finalize(&ctx.project_id, &1);

    ctx.escrow
        .refund_withdraw(&ctx.project_id, &1, &ctx.purchaser1);
    assert_eq!(value_balance(&ctx, &ctx.purchaser1), 10_020_000);
    let repeat = ctx
        .escrow
        .try_refund_withdraw(&ctx.project_id, &1, &ctx.purchaser1);
    assert_eq!(repeat, Err(Ok(EscrowError::AlreadyClaimed)));

    // the owner collects the remaining lock net of refunds
    ctx.escrow.payment_withdraw(&ctx.project_id, &1);
    assert_eq!(value_balance(&ctx, &ctx.owner), 4_980_000);
    let repeat = ctx.escrow.try_payment_withdraw(&ctx.project_id, &1);
    assert_eq!(repeat, Err(Ok(EscrowError::AlreadyClaimed)));
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    // ---- milestone 2: no refunds, no bids, runs to completion ----
    ctx.escrow
        .activate(&ctx.project_id, &2, &2_000_000, &end1, &(end1 + ONE_WEEK));
    let end2 = end1 + MILESTONE_LENGTH;
    set_time(&ctx, end2);
    ctx.escrow.founder_finalize(&ctx.project_id, &2);
    let (_, state, uncommitted) = ctx.registry.get_project_info(&ctx.project_id);
    assert_eq!(state, ProjectState::Complete);
    assert_eq!(uncommitted, 3_499_200);

    ctx.escrow.payment_withdraw(&ctx.project_id, &2);
    assert_eq!(value_balance(&ctx, &ctx.owner), 6_980_000);
    assert_ledger_conserved(&ctx, 2, &[&ctx.purchaser1, &ctx.purchaser2]);

    // end state: every unit of the 10,500,000 raised is accounted for
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::ProjectBalance(ctx.project_id.clone())),
        3_499_200
    );
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::RegulatorReserve(ctx.project_id.clone())),
        700
    );
    assert_eq!(value_balance(&ctx, &ctx.fund_id), 3_499_900);
    assert_eq!(token_balance(&ctx, &ctx.escrow.address), 100_000);
}

#[test]
fn test_sale_supply_and_finalize_guards() {
    let ctx = setup();

    ctx.registry.start_token_sale(&ctx.project_id, &5, &1_000);

    // 300 paid would owe 1,500 tokens against a 1,000 supply
    let over = ctx
        .registry
        .try_buy_tokens(&ctx.project_id, &ctx.purchaser1, &300);
    assert_eq!(over, Err(Ok(RegistryError::ExceedsSaleSupply)));

    ctx.registry.buy_tokens(&ctx.project_id, &ctx.purchaser1, &200);
    assert_eq!(token_balance(&ctx, &ctx.purchaser1), 1_000);

    ctx.registry.finalize(&ctx.project_id);
    let repeat = ctx.registry.try_finalize(&ctx.project_id);
    assert_eq!(repeat, Err(Ok(RegistryError::SaleAlreadyFinalized)));
    let late_buy = ctx
        .registry
        .try_buy_tokens(&ctx.project_id, &ctx.purchaser2, &10);
    assert_eq!(late_buy, Err(Ok(RegistryError::InvalidState)));

    ctx.registry.withdraw_unsold_tokens(&ctx.project_id);
    let repeat = ctx.registry.try_withdraw_unsold_tokens(&ctx.project_id);
    assert_eq!(repeat, Err(Ok(RegistryError::AlreadyClaimed)));
}

#[test]
fn test_finalize_requires_reward_cap_raised() {
    let ctx = setup();

    let objectives: Vec<Objective> = vec![&ctx.env, objective(&ctx, "obj_one", "tech", 500)];
    ctx.escrow
        .add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &objectives);

    ctx.registry.start_token_sale(&ctx.project_id, &5, &10_000);
    ctx.registry.buy_tokens(&ctx.project_id, &ctx.purchaser1, &400);

    // 400 raised cannot back a 500 reward reserve
    let result = ctx.registry.try_finalize(&ctx.project_id);
    assert_eq!(result, Err(Ok(RegistryError::InsufficientBalance)));

    ctx.registry.buy_tokens(&ctx.project_id, &ctx.purchaser1, &100);
    ctx.registry.finalize(&ctx.project_id);
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::RegulatorReserve(ctx.project_id.clone())),
        500
    );
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::ProjectBalance(ctx.project_id.clone())),
        0
    );
}

#[test]
fn test_milestone_activation_order_and_windows() {
    let ctx = setup();

    let objectives: Vec<Objective> = vec![&ctx.env, objective(&ctx, "obj_one", "tech", 10)];
    ctx.escrow
        .add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &objectives);
    ctx.escrow
        .add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &objectives);

    ctx.registry.start_token_sale(&ctx.project_id, &5, &1_000_000);
    ctx.registry
        .buy_tokens(&ctx.project_id, &ctx.purchaser1, &100_000);
    ctx.registry.finalize(&ctx.project_id);

    // declarations freeze once the milestone phase begins
    let late = ctx
        .escrow
        .try_add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &objectives);
    assert_eq!(late, Err(Ok(EscrowError::InvalidState)));

    // milestone 2 cannot run before milestone 1
    let skip = ctx
        .escrow
        .try_activate(&ctx.project_id, &2, &10_000, &T0, &(T0 + ONE_WEEK));
    assert_eq!(skip, Err(Ok(EscrowError::PredecessorNotComplete)));

    // start window gates
    let early = ctx.escrow.try_activate(
        &ctx.project_id,
        &1,
        &10_000,
        &(T0 + ONE_WEEK),
        &(T0 + 2 * ONE_WEEK),
    );
    assert_eq!(early, Err(Ok(EscrowError::NotYetEligible)));
    let late = ctx
        .escrow
        .try_activate(&ctx.project_id, &1, &10_000, &(T0 - 100), &(T0 - 1));
    assert_eq!(late, Err(Ok(EscrowError::WindowExpired)));

    ctx.escrow
        .activate(&ctx.project_id, &1, &10_000, &T0, &(T0 + ONE_WEEK));

    // still running: neither refunds nor closure are open yet
    let end1 = T0 + MILESTONE_LENGTH;
    let early = ctx.escrow.try_start_refund_stage(&ctx.project_id, &1);
    assert_eq!(early, Err(Ok(EscrowError::NotYetEligible)));
    let early = ctx.escrow.try_founder_finalize(&ctx.project_id, &1);
    assert_eq!(early, Err(Ok(EscrowError::NotYetEligible)));
    let running = ctx
        .escrow
        .try_activate(&ctx.project_id, &2, &10_000, &T0, &(T0 + ONE_WEEK));
    assert_eq!(running, Err(Ok(EscrowError::PredecessorNotComplete)));

    // once the window elapses the milestone reads complete and its successor
    // can start
    set_time(&ctx, end1);
    assert_eq!(
        ctx.escrow.milestone_state(&ctx.project_id, &1),
        MilestoneState::Completion
    );
    ctx.escrow
        .activate(&ctx.project_id, &2, &10_000, &end1, &(end1 + ONE_WEEK));
    assert_eq!(
        ctx.escrow.milestone_state(&ctx.project_id, &2),
        MilestoneState::InProgress
    );
}

#[test]
fn test_activate_rejects_unrepresentable_schedule() {
    let ctx = setup();

    let objectives: Vec<Objective> = vec![&ctx.env, objective(&ctx, "obj_one", "tech", 10)];
    ctx.escrow
        .add_milestone(&ctx.project_id, &u64::MAX, &objectives);

    ctx.registry.start_token_sale(&ctx.project_id, &5, &1_000_000);
    ctx.registry
        .buy_tokens(&ctx.project_id, &ctx.purchaser1, &100_000);
    ctx.registry.finalize(&ctx.project_id);

    // a schedule that cannot be represented fails with the typed error
    // before any funds move
    let result = ctx
        .escrow
        .try_activate(&ctx.project_id, &1, &10_000, &T0, &(T0 + ONE_WEEK));
    assert_eq!(result, Err(Ok(EscrowError::Overflow)));
    assert_eq!(
        ctx.fund
            .balance(&EntryKey::MilestoneLocked(ctx.project_id.clone(), 1)),
        0
    );
}

#[test]
fn test_refund_window_and_conversion() {
    let ctx = setup();

    let objectives: Vec<Objective> = vec![&ctx.env, objective(&ctx, "obj_one", "tech", 10)];
    ctx.escrow
        .add_milestone(&ctx.project_id, &MILESTONE_LENGTH, &objectives);

    ctx.registry.start_token_sale(&ctx.project_id, &5, &1_000_000);
    ctx.registry
        .buy_tokens(&ctx.project_id, &ctx.purchaser1, &100_000);
    ctx.registry.finalize(&ctx.project_id);
    ctx.escrow
        .activate(&ctx.project_id, &1, &50_000, &T0, &(T0 + ONE_WEEK));

    // refunds only run during the refund stage
    let early = ctx
        .escrow
        .try_refund(&ctx.project_id, &1, &ctx.purchaser1, &1_000);
    assert_eq!(early, Err(Ok(EscrowError::InvalidState)));

    let end1 = T0 + MILESTONE_LENGTH;
    set_time(&ctx, end1 - ONE_WEEK);
    ctx.escrow.start_refund_stage(&ctx.project_id, &1);
    let repeat = ctx.escrow.try_start_refund_stage(&ctx.project_id, &1);
    assert_eq!(repeat, Err(Ok(EscrowError::InvalidState)));

    // below one price unit converts to zero value
    let dust = ctx
        .escrow
        .try_refund(&ctx.project_id, &1, &ctx.purchaser1, &4);
    assert_eq!(dust, Err(Ok(EscrowError::InvalidAmount)));

    // refund value cannot exceed what the milestone still locks
    let too_big = ctx
        .escrow
        .try_refund(&ctx.project_id, &1, &ctx.purchaser1, &300_000);
    assert_eq!(too_big, Err(Ok(EscrowError::InsufficientBalance)));

    ctx.escrow
        .refund(&ctx.project_id, &1, &ctx.purchaser1, &250_000);
    assert_eq!(
        ctx.fund.balance(&EntryKey::RefundLocked(
            ctx.project_id.clone(),
            1,
            ctx.purchaser1.clone()
        )),
        50_000
    );

    // the window shuts at the milestone end
    set_time(&ctx, end1);
    let late = ctx
        .escrow
        .try_refund(&ctx.project_id, &1, &ctx.purchaser1, &1_000);
    assert_eq!(late, Err(Ok(EscrowError::WindowExpired)));

    ctx.escrow
        .refund_withdraw(&ctx.project_id, &1, &ctx.purchaser1);
    assert_eq!(value_balance(&ctx, &ctx.purchaser1), 19_950_000);
}

#[test]
fn test_unknown_project_has_no_reachable_funds() {
    let ctx = setup();

    let other: ProjectId = BytesN::from_array(&ctx.env, &[8u8; 32]);
    let missing = ctx.registry.try_accept_application(&other);
    assert_eq!(missing, Err(Ok(RegistryError::ProjectNotFound)));

    // value cannot be conjured for a project that never sold tokens
    assert_eq!(
        ctx.fund.balance(&EntryKey::ProjectBalance(other.clone())),
        0
    );
    let nothing = ctx.escrow.try_refund_withdraw(&other, &1, &ctx.purchaser1);
    assert_eq!(nothing, Err(Ok(EscrowError::AlreadyClaimed)));
}

mod common;

use zombie_game::difficulty::Difficulty;
use zombie_game::error::PurchaseError;
use zombie_game::upgrades::{PurchaseUpgrade, UpgradeKey, UpgradeLevels, UpgradePurchased, Wallet};

use common::{buffered, send, started_app, tick, TICK_MS};

#[test]
fn first_fire_rate_level_costs_fifteen_on_normal() {
    let levels = UpgradeLevels::default();
    assert_eq!(levels.cost(UpgradeKey::FireRate, Difficulty::Normal), 15);
    assert_eq!(levels.cost(UpgradeKey::Burst, Difficulty::Normal), 40);
    assert_eq!(levels.cost(UpgradeKey::FireRate, Difficulty::Hard), 17);
}

#[test]
fn max_health_is_always_free() {
    let mut levels = UpgradeLevels::default();
    levels.grant(UpgradeKey::BulletDamage, 12);
    levels.grant(UpgradeKey::MaxPlayerHealth, 4);
    assert_eq!(levels.cost(UpgradeKey::MaxPlayerHealth, Difficulty::Adonis), 0);

    let mut broke = Wallet::new(0.0);
    assert_eq!(levels.purchase(UpgradeKey::MaxPlayerHealth, &mut broke, Difficulty::Normal), Ok(0));
    assert_eq!(levels.level(UpgradeKey::MaxPlayerHealth), 5);
}

#[test]
fn every_level_raises_every_price() {
    let mut levels = UpgradeLevels::default();
    let before = levels.cost(UpgradeKey::BulletDamage, Difficulty::Normal);
    levels.grant(UpgradeKey::FireRate, 1);
    let after = levels.cost(UpgradeKey::BulletDamage, Difficulty::Normal);
    // (10 + 1 * 2) * 1.1
    assert_eq!(before, 11);
    assert_eq!(after, 13);
}

#[test]
fn purchase_debits_wallet_and_raises_level() {
    let mut levels = UpgradeLevels::default();
    let mut wallet = Wallet::default();
    assert_eq!(levels.purchase(UpgradeKey::FireRate, &mut wallet, Difficulty::Normal), Ok(15));
    assert_eq!(wallet.coins, 5.0);
    assert_eq!(levels.level(UpgradeKey::FireRate), 1);
    assert_eq!(levels.total(), 1);
}

#[test]
fn unaffordable_purchase_changes_nothing() {
    let mut levels = UpgradeLevels::default();
    let mut wallet = Wallet::new(14.5);
    let result = levels.purchase(UpgradeKey::FireRate, &mut wallet, Difficulty::Normal);
    assert_eq!(
        result,
        Err(PurchaseError::InsufficientFunds {
            key: UpgradeKey::FireRate,
            cost: 15,
            balance: 14.5,
        })
    );
    assert_eq!(wallet.coins, 14.5);
    assert_eq!(levels, UpgradeLevels::default());
}

#[test]
fn purchase_event_buys_through_the_app() {
    let mut app = started_app(Difficulty::Normal);
    send(&mut app, PurchaseUpgrade(UpgradeKey::FireRate));
    tick(&mut app, TICK_MS);

    assert_eq!(app.world.resource::<UpgradeLevels>().level(UpgradeKey::FireRate), 1);
    assert_eq!(app.world.resource::<Wallet>().coins, 5.0);
    let purchased = buffered::<UpgradePurchased>(&app);
    assert_eq!(
        purchased,
        vec![UpgradePurchased { key: UpgradeKey::FireRate, level: 1, cost: 15 }]
    );

    // 5 coins left, the next level is out of reach.
    send(&mut app, PurchaseUpgrade(UpgradeKey::FireRate));
    tick(&mut app, TICK_MS);
    assert_eq!(app.world.resource::<UpgradeLevels>().level(UpgradeKey::FireRate), 1);
    assert_eq!(app.world.resource::<Wallet>().coins, 5.0);
}

#[test]
fn a_run_starts_with_the_configured_coins() {
    let app = started_app(Difficulty::Easy);
    assert_eq!(app.world.resource::<Wallet>().coins, 20.0);
    assert_eq!(app.world.resource::<UpgradeLevels>().total(), 0);
}

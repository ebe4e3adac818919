//! Attacker weapon records.

use serde::{Deserialize, Serialize};

use super::item::{Critical, DamageType, Spectrum};

/// Weapon class; drives melee/ranged fit, overflow, and damage utilities.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Ranged ballistic cannon.
    BallisticCannon,
    /// Ranged ballistic gun.
    BallisticGun,
    /// Ranged energy cannon.
    EnergyCannon,
    /// Ranged energy gun.
    EnergyGun,
    /// Launcher; fires interceptable projectiles by default.
    Launcher,
    /// Special ranged weapon.
    SpecialWeapon,
    /// Blunt melee weapon.
    ImpactWeapon,
    /// Armor-piercing melee weapon.
    PiercingWeapon,
    /// Edged melee weapon.
    SlashingWeapon,
    /// Special melee weapon.
    SpecialMeleeWeapon,
}

impl WeaponKind {
    /// Whether the class is a melee weapon.
    #[must_use]
    pub fn is_melee(self) -> bool {
        matches!(
            self,
            Self::ImpactWeapon | Self::PiercingWeapon | Self::SlashingWeapon | Self::SpecialMeleeWeapon
        )
    }

    /// Whether the class is a gun; guns never overflow excess damage.
    #[must_use]
    pub fn is_gun(self) -> bool {
        matches!(self, Self::BallisticGun | Self::EnergyGun)
    }

    /// Whether the class benefits from particle charging.
    #[must_use]
    pub fn accelerated(self) -> bool {
        matches!(self, Self::EnergyGun | Self::EnergyCannon)
    }

    /// Whether the class benefits from kinecellerators.
    #[must_use]
    pub fn ballistic(self) -> bool {
        matches!(self, Self::BallisticGun | Self::BallisticCannon)
    }
}

/// Direct-hit damage profile of a weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageSpec {
    /// Minimum damage per projectile.
    pub min: i32,
    /// Maximum damage per projectile.
    pub max: i32,
    /// Damage type.
    pub ty: DamageType,
    /// Chance to disrupt the target on a core hit, percent.
    pub disruption: i32,
    /// Spectrum rating, if any.
    pub spectrum: Option<Spectrum>,
}

/// Explosion profile of a weapon (launchers and similar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionSpec {
    /// Minimum explosion damage.
    pub min: i32,
    /// Maximum explosion damage.
    pub max: i32,
    /// Damage type of the explosion.
    pub ty: DamageType,
    /// Disruption chance, percent.
    pub disruption: i32,
    /// Spectrum rating; only matters for grounded engines, ignored in the
    /// air, so explosion chunks themselves never carry it.
    pub spectrum: Option<Spectrum>,
    /// Minimum number of damage chunks the explosion splits into.
    pub chunks_min: i32,
    /// Maximum number of damage chunks.
    pub chunks_max: i32,
}

/// A fully-resolved weapon record.
///
/// The `guided`, `missile`, and `ram` flags are resolved by the data layer;
/// the engine never infers behavior from item names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    /// Weapon name.
    pub name: String,
    /// Weapon class.
    pub kind: WeaponKind,
    /// Direct-hit damage, if the weapon deals any.
    pub damage: Option<DamageSpec>,
    /// Explosion damage, if the weapon deals any.
    pub explosion: Option<ExplosionSpec>,
    /// Critical chance, percent.
    pub critical_chance: i32,
    /// Critical effect kind, if the weapon can crit.
    pub critical: Option<Critical>,
    /// Extra volley delay contributed by this weapon.
    pub delay: i32,
    /// Recoil imposed on the rest of the volley.
    pub recoil: i32,
    /// Built-in targeting bonus.
    pub targeting: i32,
    /// Projectiles fired per volley.
    pub projectiles: i32,
    /// Weapon mass; only matters for ramming.
    pub mass: i32,
    /// Salvage modifier applied to the target on hits.
    pub salvage: i32,
    /// Waypoint-guided weapons always hit.
    pub guided: bool,
    /// Whether antimissile defenses can intercept the projectile.
    pub missile: bool,
    /// Whether this "weapon" is actually a ramming maneuver.
    pub ram: bool,
}

impl WeaponDef {
    /// Creates a weapon with the given class and no damage profiles.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: WeaponKind) -> Self {
        Self {
            name: name.into(),
            kind,
            damage: None,
            explosion: None,
            critical_chance: 0,
            critical: None,
            delay: 0,
            recoil: 0,
            targeting: 0,
            projectiles: 1,
            mass: 0,
            salvage: 0,
            guided: false,
            missile: kind == WeaponKind::Launcher,
            ram: false,
        }
    }

    /// Attaches a direct-hit damage profile.
    #[must_use]
    pub fn with_damage(mut self, min: i32, max: i32, ty: DamageType) -> Self {
        self.damage = Some(DamageSpec {
            min,
            max,
            ty,
            disruption: 0,
            spectrum: None,
        });
        self
    }

    /// Attaches an explosion profile resolving in a single chunk.
    #[must_use]
    pub fn with_explosion(mut self, min: i32, max: i32, ty: DamageType) -> Self {
        self.explosion = Some(ExplosionSpec {
            min,
            max,
            ty,
            disruption: 0,
            spectrum: None,
            chunks_min: 1,
            chunks_max: 1,
        });
        self
    }

    /// Sets the critical chance and effect.
    #[must_use]
    pub fn with_critical(mut self, chance: i32, kind: Critical) -> Self {
        self.critical_chance = chance;
        self.critical = Some(kind);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classification() {
        assert!(WeaponKind::PiercingWeapon.is_melee());
        assert!(!WeaponKind::Launcher.is_melee());
        assert!(WeaponKind::BallisticGun.is_gun());
        assert!(!WeaponKind::BallisticCannon.is_gun());
        assert!(WeaponKind::EnergyCannon.accelerated());
        assert!(WeaponKind::BallisticCannon.ballistic());
    }

    #[test]
    fn launchers_default_to_missiles() {
        let launcher = WeaponDef::new("Grenade Launcher", WeaponKind::Launcher);
        assert!(launcher.missile);
        let gun = WeaponDef::new("Assault Rifle", WeaponKind::BallisticGun);
        assert!(!gun.missile);
    }
}

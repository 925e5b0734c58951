use rampart_core::{Position, SlotId, TowerClass, TowerId};

/// A constructed tower occupying one placement slot.
#[derive(Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) class: TowerClass,
    pub(crate) slot: SlotId,
    pub(crate) position: Position,
    pub(crate) physic_level: u32,
    pub(crate) magic_level: u32,
    pub(crate) buff_damage: f32,
    pub(crate) cost: i64,
}

impl Tower {
    /// Refund granted when the tower is sold; a third of the cost is kept.
    #[must_use]
    pub(crate) fn sell_refund(&self) -> i64 {
        self.cost - self.cost / 3
    }
}

#[cfg(test)]
mod tests {
    use super::Tower;
    use rampart_core::{Position, SlotId, TowerClass, TowerId};

    #[test]
    fn sell_refund_keeps_a_third_of_the_cost() {
        let tower = Tower {
            id: TowerId::new(1),
            class: TowerClass::Arrow,
            slot: SlotId::new(0),
            position: Position::new(0.0, 0.0),
            physic_level: 0,
            magic_level: 0,
            buff_damage: 0.0,
            cost: 120,
        };
        assert_eq!(tower.sell_refund(), 80);
    }
}

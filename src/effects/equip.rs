//! Equip attach.

use super::resolver::ResolverContext;
use crate::cards::{CardId, SpellKind, ZoneCard};
use crate::core::{EngineError, EngineResult, MatchState, Side};
use crate::effects::{Applied, FailureKind, Rejected, Step};
use crate::store::EventType;
use crate::zones::{locate, locate_on, ZoneKind};

/// Attach an equip spell from `side`'s hand to a monster on either board.
///
/// The equip occupies one of `side`'s spell/trap slots with `equipped_to`
/// set, and the host records it in `equipped_cards`.
pub fn equip(
    state: &mut MatchState,
    ctx: &ResolverContext<'_>,
    side: Side,
    equip_id: CardId,
    target: CardId,
) -> EngineResult<Step> {
    let Some(in_hand) = locate_on(state, side, equip_id, ZoneKind::Hand) else {
        return Ok(Err(Rejected::not_found(equip_id, ZoneKind::Hand)));
    };
    let def = ctx.cards.card_definition(equip_id).ok_or(EngineError::UnknownCard(equip_id))?;
    if def.card_type.spell_kind() != Some(SpellKind::Equip) {
        return Ok(Err(Rejected::illegal(format!("{} is not an equip spell", def.name))));
    }
    let Some(host) = locate(state, target, ZoneKind::Board) else {
        return Ok(Err(Rejected::not_found(target, ZoneKind::Board)));
    };
    if state.side(side).spell_trap_slots_free(ctx.config.spell_trap_capacity) == 0 {
        return Ok(Err(Rejected::new(
            FailureKind::CapacityExceeded,
            format!("{side}'s spell/trap zone is full"),
        )));
    }

    let turn = state.turn_number;
    let holder = state.side_mut(side);
    holder.hand.remove(in_hand.index);
    holder.spell_trap_zone.push_back(ZoneCard::equip(equip_id, target, turn));
    state.side_mut(host.side).board[host.index].equipped_cards.push(equip_id);

    Ok(Ok(Applied::new(
        EventType::EquipAttached,
        format!("Equipped {} to {}", def.name, ctx.cards.name_of(target)),
    )
    .with_card("card_id", equip_id)
    .with_card("target_id", target)))
}

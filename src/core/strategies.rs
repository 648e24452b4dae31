/// Built-in strategy catalogue: the motivation strategies and the verb
/// expansions registered by [`ExecutorRegistry::standard`].
///
/// [`ExecutorRegistry::standard`]: crate::core::executor::ExecutorRegistry::standard

use crate::core::executor::{Expansion, Strategy};
use crate::core::quest::{Quest, QuestError};
use crate::schema::action_type::ActionType;
use crate::schema::motivation::Motivation;
use crate::schema::objective::ObjectiveType::*;
use crate::schema::objective::Objectives;

pub const BEINGS: &str = "pnj/being/*";
pub const MERCHANTS: &str = "pnj/being/merchant/*";
pub const PESTS: &str = "pnj/beast/pests/*";
pub const MONSTERS: &str = "pnj/beast/monster/*";
pub const ENEMIES: &str = "pnj/enemy/*";
pub const CRIMINALS: &str = "pnj/enemy/criminal/*";
pub const PLACES: &str = "area/place/*";
pub const WORKPLACES: &str = "area/place/job/*";
pub const DANGEROUS: &str = "area/dangerous/*";
pub const WILDS: &str = "area/wild/*";
pub const MINES: &str = "area/wild/mine/*";
pub const PERSONAL: &str = "object/personal/*";
pub const LUXURY: &str = "object/luxury/*";
pub const RARE: &str = "object/rare/*";
pub const READABLE: &str = "object/readable/*";
pub const SKILL_BOOKS: &str = "object/readable/learning/skill/*";
pub const TRAINING: &str = "object/training/*";
pub const TOOLS: &str = "object/tool/*";
pub const SUPPLIES: &str = "object/supply/*";
pub const MEDICINE: &str = "object/supply/medicine/*";
pub const MATERIALS: &str = "object/material/*";
pub const MAGIC: &str = "skill/magic/*";
pub const COMBAT: &str = "skill/combat/*";

/// Every category pattern the catalogue draws from.
pub const PATTERNS: &[&str] = &[
    BEINGS, MERCHANTS, PESTS, MONSTERS, ENEMIES, CRIMINALS, PLACES, WORKPLACES, DANGEROUS,
    WILDS, MINES, PERSONAL, LUXURY, RARE, READABLE, SKILL_BOOKS, TRAINING, TOOLS, SUPPLIES,
    MEDICINE, MATERIALS, MAGIC, COMBAT,
];

pub const MOTIVATION_STRATEGIES: &[(Motivation, Strategy)] = &[
    (Motivation::Knowledge, Strategy::new("deliver_item_for_study", deliver_item_for_study)),
    (Motivation::Knowledge, Strategy::new("spy", spy)),
    (Motivation::Knowledge, Strategy::new("interview", interview)),
    (Motivation::Knowledge, Strategy::new("use_item_in_field", use_item_in_field)),
    (Motivation::Comfort, Strategy::new("kill_pests", kill_pests)),
    (Motivation::Reputation, Strategy::new("obtain_rare_items", obtain_rare_items)),
    (Motivation::Reputation, Strategy::new("kill_enemies", kill_enemies)),
    (Motivation::Reputation, Strategy::new("visit_dangerous_place", visit_dangerous_place)),
    (Motivation::Serenity, Strategy::new("revenge", revenge)),
    (Motivation::Serenity, Strategy::new("capture_criminal", capture_criminal)),
    (Motivation::Serenity, Strategy::new("check_on_npc", check_on_npc)),
    (Motivation::Serenity, Strategy::new("recover_item", recover_item)),
    (Motivation::Serenity, Strategy::new("rescue", rescue)),
    (Motivation::Protection, Strategy::new("attack_threat", attack_threat)),
    (Motivation::Protection, Strategy::new("treat", treat)),
    (Motivation::Protection, Strategy::new("repair", repair)),
    (Motivation::Protection, Strategy::new("guard", guard)),
    (Motivation::Conquest, Strategy::new("attack_enemy", attack_enemy)),
    (Motivation::Conquest, Strategy::new("steal_stuff", steal_stuff)),
    (Motivation::Wealth, Strategy::new("gather", gather)),
    (Motivation::Wealth, Strategy::new("steal_valuables", steal_valuables)),
    (Motivation::Wealth, Strategy::new("make", make)),
    (Motivation::Ability, Strategy::new("research_skill", research_skill)),
    (Motivation::Ability, Strategy::new("practice_skill", practice_skill)),
    (Motivation::Ability, Strategy::new("practice_combat", practice_combat)),
    (Motivation::Ability, Strategy::new("experiment", experiment)),
    (Motivation::Equipment, Strategy::new("assemble", assemble)),
    (Motivation::Equipment, Strategy::new("deliver_supplies", deliver_supplies)),
    (Motivation::Equipment, Strategy::new("steal_supplies", steal_supplies)),
    (Motivation::Equipment, Strategy::new("trade", trade)),
];

pub const VERB_EXPANSIONS: &[(ActionType, Strategy)] = &[
    (ActionType::Goto, Strategy::new("goto_direct", direct)),
    (ActionType::Goto, Strategy::new("goto_learn_way", goto_learn_way)),
    (ActionType::Goto, Strategy::new("goto_explore", goto_explore)),
    (ActionType::Learn, Strategy::new("learn_known", direct)),
    (ActionType::Learn, Strategy::new("learn_by_asking", learn_by_asking)),
    (ActionType::Learn, Strategy::new("learn_by_reading", learn_by_reading)),
    (ActionType::Learn, Strategy::new("learn_by_trading", learn_by_trading)),
    (ActionType::Get, Strategy::new("get_direct", direct)),
    (ActionType::Get, Strategy::new("get_by_stealing", get_by_stealing)),
    (ActionType::Get, Strategy::new("get_by_gathering", get_by_gathering)),
    (ActionType::Get, Strategy::new("get_by_trading", get_by_trading)),
    (ActionType::Steal, Strategy::new("steal_direct", direct)),
    (ActionType::Steal, Strategy::new("steal_stealthily", steal_stealthily)),
    (ActionType::Steal, Strategy::new("steal_by_force", steal_by_force)),
    (ActionType::Spy, Strategy::new("spy_direct", direct)),
    (ActionType::Spy, Strategy::new("spy_and_report", spy_and_report)),
    (ActionType::Capture, Strategy::new("capture_direct", direct)),
    (ActionType::Capture, Strategy::new("capture_with_gear", capture_with_gear)),
    (ActionType::Kill, Strategy::new("kill_direct", direct)),
    (ActionType::Kill, Strategy::new("kill_hunt", kill_hunt)),
    (ActionType::Quest, Strategy::new("quest_subquest", quest_subquest)),
];

type Built = Result<Quest, QuestError>;

// Knowledge

fn deliver_item_for_study(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.resolve(ObjGet, None, &[READABLE, RARE])?;
    let source = ex.pick(&[BEINGS, PLACES])?;
    let scholar = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, item.clone()), (LocObjective, source)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, scholar.clone())]))?,
        ex.leaf(
            ActionType::Give,
            Objectives::from([(ObjGive, item), (LocObjective, scholar)]),
        )?,
    ];
    ex.quest(actions)
}

fn spy(ex: &mut Expansion<'_, '_>) -> Built {
    let target = ex.resolve(Objective, None, &[BEINGS, ENEMIES])?;
    let actions = vec![ex.action(ActionType::Spy, Objectives::from([(Objective, target)]))?];
    ex.quest(actions)
}

fn interview(ex: &mut Expansion<'_, '_>) -> Built {
    let informant = ex.pick(&[BEINGS])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, informant.clone())]))?,
        ex.leaf(ActionType::Listen, Objectives::from([(Objective, informant)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

fn use_item_in_field(ex: &mut Expansion<'_, '_>) -> Built {
    let tool = ex.pick(&[TOOLS])?;
    let source = ex.pick(&[BEINGS, PLACES])?;
    let field = ex.pick(&[WILDS, DANGEROUS])?;
    let scholar = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, tool.clone()), (LocObjective, source)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, field.clone())]))?,
        ex.leaf(
            ActionType::Use,
            Objectives::from([(ObjUse, tool.clone()), (LocObjective, field)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, scholar.clone())]))?,
        ex.leaf(
            ActionType::Give,
            Objectives::from([(ObjGive, tool), (LocObjective, scholar)]),
        )?,
    ];
    ex.quest(actions)
}

// Comfort

fn kill_pests(ex: &mut Expansion<'_, '_>) -> Built {
    let pest = ex.pick(&[PESTS])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, pest.clone())]))?,
        ex.leaf(ActionType::Damage, Objectives::from([(Objective, pest)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

// Reputation

fn obtain_rare_items(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.pick(&[RARE])?;
    let source = ex.pick(&[DANGEROUS, PLACES])?;
    let patron = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, item.clone()), (LocObjective, source)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, patron.clone())]))?,
        ex.leaf(
            ActionType::Give,
            Objectives::from([(ObjGive, item), (LocObjective, patron)]),
        )?,
    ];
    ex.quest(actions)
}

fn kill_enemies(ex: &mut Expansion<'_, '_>) -> Built {
    let enemy = ex.pick(&[ENEMIES, MONSTERS])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, enemy.clone())]))?,
        ex.leaf(ActionType::Kill, Objectives::from([(Objective, enemy)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

fn visit_dangerous_place(ex: &mut Expansion<'_, '_>) -> Built {
    let place = ex.pick(&[DANGEROUS])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, place)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

// Serenity

fn revenge(ex: &mut Expansion<'_, '_>) -> Built {
    let target = ex.resolve(Objective, None, &[ENEMIES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, target.clone())]))?,
        ex.leaf(ActionType::Damage, Objectives::from([(Objective, target)]))?,
    ];
    ex.quest(actions)
}

fn capture_criminal(ex: &mut Expansion<'_, '_>) -> Built {
    let gear = ex.pick(&[TOOLS])?;
    let source = ex.pick(&[BEINGS, PLACES])?;
    let criminal = ex.pick(&[CRIMINALS])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, gear.clone()), (LocObjective, source)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, criminal.clone())]))?,
        ex.leaf(
            ActionType::Use,
            Objectives::from([(ObjUse, gear), (LocObjective, criminal.clone())]),
        )?,
        ex.leaf(ActionType::Capture, Objectives::from([(Objective, criminal)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

/// The NPC to listen to comes from the same category as the one reported to.
fn check_on_npc(ex: &mut Expansion<'_, '_>) -> Built {
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let listened = ex.pick_sibling(&reportee)?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, listened.clone())]))?,
        ex.leaf(ActionType::Listen, Objectives::from([(Objective, listened)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

fn recover_item(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.pick(&[PERSONAL, LUXURY])?;
    let thief = ex.pick(&[CRIMINALS])?;
    let owner = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, item.clone()), (LocObjective, thief)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, owner.clone())]))?,
        ex.leaf(
            ActionType::Give,
            Objectives::from([(ObjGive, item), (LocObjective, owner)]),
        )?,
    ];
    ex.quest(actions)
}

fn rescue(ex: &mut Expansion<'_, '_>) -> Built {
    let captor = ex.pick(&[ENEMIES, MONSTERS])?;
    let victim = ex.pick(&[BEINGS])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, captor.clone())]))?,
        ex.leaf(ActionType::Damage, Objectives::from([(Objective, captor)]))?,
        ex.leaf(ActionType::Escort, Objectives::from([(Objective, victim)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

// Protection

fn attack_threat(ex: &mut Expansion<'_, '_>) -> Built {
    let threat = ex.pick(&[MONSTERS, ENEMIES])?;
    let reportee = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, threat.clone())]))?,
        ex.leaf(ActionType::Damage, Objectives::from([(Objective, threat)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, reportee.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, reportee)]))?,
    ];
    ex.quest(actions)
}

fn treat(ex: &mut Expansion<'_, '_>) -> Built {
    let remedy = ex.pick(&[MEDICINE])?;
    let source = ex.pick(&[BEINGS])?;
    let patient = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, remedy.clone()), (LocObjective, source)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, patient.clone())]))?,
        ex.leaf(
            ActionType::Use,
            Objectives::from([(ObjUse, remedy), (LocObjective, patient)]),
        )?,
    ];
    ex.quest(actions)
}

fn repair(ex: &mut Expansion<'_, '_>) -> Built {
    let site = ex.pick(&[WORKPLACES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, site.clone())]))?,
        ex.leaf(ActionType::Repair, Objectives::from([(Objective, site)]))?,
    ];
    ex.quest(actions)
}

fn guard(ex: &mut Expansion<'_, '_>) -> Built {
    let post = ex.resolve(Objective, None, &[PLACES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, post.clone())]))?,
        ex.leaf(ActionType::Defend, Objectives::from([(Objective, post)]))?,
    ];
    ex.quest(actions)
}

// Conquest

fn attack_enemy(ex: &mut Expansion<'_, '_>) -> Built {
    let enemy = ex.resolve(Objective, None, &[ENEMIES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, enemy.clone())]))?,
        ex.leaf(ActionType::Damage, Objectives::from([(Objective, enemy)]))?,
    ];
    ex.quest(actions)
}

fn steal_stuff(ex: &mut Expansion<'_, '_>) -> Built {
    let loot = ex.pick(&[LUXURY, RARE])?;
    let victim = ex.pick(&[ENEMIES])?;
    let boss = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, victim.clone())]))?,
        ex.action(
            ActionType::Steal,
            Objectives::from([(ObjGet, loot.clone()), (Pnj, victim)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, boss.clone())]))?,
        ex.leaf(
            ActionType::Give,
            Objectives::from([(ObjGive, loot), (LocObjective, boss)]),
        )?,
    ];
    ex.quest(actions)
}

// Wealth

fn gather(ex: &mut Expansion<'_, '_>) -> Built {
    let site = ex.pick(&[MINES])?;
    let material = ex.pick(&[MATERIALS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, site.clone())]))?,
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, material), (LocObjective, site)]),
        )?,
    ];
    ex.quest(actions)
}

fn steal_valuables(ex: &mut Expansion<'_, '_>) -> Built {
    let valuables = ex.pick(&[LUXURY])?;
    let victim = ex.pick(&[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, victim.clone())]))?,
        ex.action(
            ActionType::Steal,
            Objectives::from([(ObjGet, valuables), (Pnj, victim)]),
        )?,
    ];
    ex.quest(actions)
}

fn make(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.pick(&[PERSONAL, LUXURY])?;
    let actions = vec![ex.leaf(ActionType::Repair, Objectives::from([(Objective, item)]))?];
    ex.quest(actions)
}

// Ability

fn research_skill(ex: &mut Expansion<'_, '_>) -> Built {
    let book = ex.pick(&[SKILL_BOOKS])?;
    let source = ex.pick(&[BEINGS, PLACES])?;
    let skill = ex.pick(&[MAGIC])?;
    let dummy = ex.pick(&[TRAINING])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, book), (LocObjective, source)]),
        )?,
        ex.leaf(
            ActionType::Use,
            Objectives::from([(ObjUse, skill), (LocObjective, dummy)]),
        )?,
    ];
    ex.quest(actions)
}

fn practice_skill(ex: &mut Expansion<'_, '_>) -> Built {
    let skill = ex.pick(&[MAGIC, COMBAT])?;
    let dummy = ex.pick(&[TRAINING])?;
    let actions = vec![ex.leaf(
        ActionType::Use,
        Objectives::from([(ObjUse, skill), (LocObjective, dummy)]),
    )?];
    ex.quest(actions)
}

fn practice_combat(ex: &mut Expansion<'_, '_>) -> Built {
    let foe = ex.pick(&[PESTS, MONSTERS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, foe.clone())]))?,
        ex.leaf(ActionType::Damage, Objectives::from([(Objective, foe)]))?,
    ];
    ex.quest(actions)
}

fn experiment(ex: &mut Expansion<'_, '_>) -> Built {
    let ingredient = ex.pick(&[MATERIALS, SUPPLIES])?;
    let source = ex.pick(&[PLACES])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, ingredient.clone()), (LocObjective, source)]),
        )?,
        ex.leaf(ActionType::Experiment, Objectives::from([(Objective, ingredient)]))?,
    ];
    ex.quest(actions)
}

// Equipment

fn assemble(ex: &mut Expansion<'_, '_>) -> Built {
    let tool = ex.pick(&[TOOLS])?;
    let actions = vec![ex.leaf(ActionType::Repair, Objectives::from([(Objective, tool)]))?];
    ex.quest(actions)
}

fn deliver_supplies(ex: &mut Expansion<'_, '_>) -> Built {
    let supplies = ex.pick(&[SUPPLIES])?;
    let source = ex.pick(&[PLACES])?;
    let receiver = ex.resolve(Objective, None, &[BEINGS])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, supplies.clone()), (LocObjective, source)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, receiver.clone())]))?,
        ex.leaf(
            ActionType::Give,
            Objectives::from([(ObjGive, supplies), (LocObjective, receiver)]),
        )?,
    ];
    ex.quest(actions)
}

fn steal_supplies(ex: &mut Expansion<'_, '_>) -> Built {
    let supplies = ex.pick(&[SUPPLIES])?;
    let victim = ex.pick(&[ENEMIES, BEINGS])?;
    let actions = vec![ex.action(
        ActionType::Steal,
        Objectives::from([(ObjGet, supplies), (Pnj, victim)]),
    )?];
    ex.quest(actions)
}

fn trade(ex: &mut Expansion<'_, '_>) -> Built {
    let merchant = ex.pick(&[MERCHANTS])?;
    let offered = ex.pick(&[PERSONAL])?;
    let wanted = ex.pick(&[TOOLS, SUPPLIES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, merchant.clone())]))?,
        ex.leaf(
            ActionType::Exchange,
            Objectives::from([(ObjGive, offered), (ObjGet, wanted), (Pnj, merchant)]),
        )?,
    ];
    ex.quest(actions)
}

// Verb expansions. Each one reuses the objectives of the action it expands.

fn direct(ex: &mut Expansion<'_, '_>) -> Built {
    ex.epsilon()
}

fn goto_learn_way(ex: &mut Expansion<'_, '_>) -> Built {
    let place = ex.resolve(Objective, None, &[PLACES])?;
    let actions = vec![
        ex.action(ActionType::Learn, Objectives::from([(Objective, place.clone())]))?,
        ex.leaf(ActionType::Goto, Objectives::from([(Objective, place)]))?,
    ];
    ex.quest(actions)
}

fn goto_explore(ex: &mut Expansion<'_, '_>) -> Built {
    let place = ex.resolve(Objective, None, &[PLACES])?;
    let actions = vec![ex.leaf(ActionType::Explore, Objectives::from([(Objective, place)]))?];
    ex.quest(actions)
}

fn learn_by_asking(ex: &mut Expansion<'_, '_>) -> Built {
    let informant = ex.pick(&[BEINGS])?;
    let mut actions = vec![ex.action(
        ActionType::Goto,
        Objectives::from([(Objective, informant.clone())]),
    )?];
    if ex.can_split() {
        actions.push(ex.action(ActionType::Quest, Objectives::new())?);
    }
    actions.push(ex.leaf(ActionType::Listen, Objectives::from([(Objective, informant)]))?);
    ex.quest(actions)
}

fn learn_by_reading(ex: &mut Expansion<'_, '_>) -> Built {
    let book = ex.pick(&[READABLE])?;
    let library = ex.pick(&[PLACES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, library.clone())]))?,
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, book.clone()), (LocObjective, library)]),
        )?,
        ex.leaf(ActionType::Read, Objectives::from([(Objective, book)]))?,
    ];
    ex.quest(actions)
}

fn learn_by_trading(ex: &mut Expansion<'_, '_>) -> Built {
    let gift = ex.pick(&[LUXURY])?;
    let source = ex.pick(&[PLACES])?;
    let informant = ex.pick(&[BEINGS])?;
    let mut actions = vec![ex.action(
        ActionType::Get,
        Objectives::from([(ObjGet, gift.clone()), (LocObjective, source)]),
    )?];
    if ex.can_split() {
        actions.push(ex.action(ActionType::Quest, Objectives::new())?);
    }
    actions.push(ex.leaf(
        ActionType::Give,
        Objectives::from([(ObjGive, gift), (LocObjective, informant.clone())]),
    )?);
    actions.push(ex.leaf(ActionType::Listen, Objectives::from([(Objective, informant)]))?);
    ex.quest(actions)
}

fn get_by_stealing(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.resolve(ObjGet, None, &[SUPPLIES])?;
    let owner = ex.pick(&[BEINGS])?;
    let actions = vec![ex.action(
        ActionType::Steal,
        Objectives::from([(ObjGet, item), (Pnj, owner)]),
    )?];
    ex.quest(actions)
}

fn get_by_gathering(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.resolve(ObjGet, None, &[MATERIALS])?;
    let site = ex.resolve(LocObjective, None, &[WILDS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, site)]))?,
        ex.leaf(ActionType::Gather, Objectives::from([(Objective, item)]))?,
    ];
    ex.quest(actions)
}

fn get_by_trading(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.resolve(ObjGet, None, &[SUPPLIES])?;
    let merchant = ex.pick(&[MERCHANTS])?;
    let offered = ex.pick(&[PERSONAL])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, merchant.clone())]))?,
        ex.leaf(
            ActionType::Exchange,
            Objectives::from([(ObjGive, offered), (ObjGet, item), (Pnj, merchant)]),
        )?,
    ];
    ex.quest(actions)
}

fn steal_stealthily(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.resolve(ObjGet, None, &[LUXURY])?;
    let victim = ex.resolve(Pnj, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, victim.clone())]))?,
        ex.leaf(ActionType::Stealth, Objectives::from([(Objective, victim.clone())]))?,
        ex.leaf(ActionType::Take, Objectives::from([(ObjGet, item), (Pnj, victim)]))?,
    ];
    ex.quest(actions)
}

fn steal_by_force(ex: &mut Expansion<'_, '_>) -> Built {
    let item = ex.resolve(ObjGet, None, &[LUXURY])?;
    let victim = ex.resolve(Pnj, None, &[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, victim.clone())]))?,
        ex.leaf(ActionType::Kill, Objectives::from([(Objective, victim.clone())]))?,
        ex.leaf(ActionType::Take, Objectives::from([(ObjGet, item), (Pnj, victim)]))?,
    ];
    ex.quest(actions)
}

fn spy_and_report(ex: &mut Expansion<'_, '_>) -> Built {
    let target = ex.resolve(Objective, None, &[BEINGS])?;
    let handler = ex.pick(&[BEINGS])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, target.clone())]))?,
        ex.leaf(ActionType::Spy, Objectives::from([(Objective, target)]))?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, handler.clone())]))?,
        ex.leaf(ActionType::Report, Objectives::from([(Objective, handler)]))?,
    ];
    ex.quest(actions)
}

fn capture_with_gear(ex: &mut Expansion<'_, '_>) -> Built {
    let target = ex.resolve(Objective, None, &[CRIMINALS])?;
    let gear = ex.pick(&[TOOLS])?;
    let shop = ex.pick(&[PLACES])?;
    let actions = vec![
        ex.action(
            ActionType::Get,
            Objectives::from([(ObjGet, gear), (LocObjective, shop)]),
        )?,
        ex.action(ActionType::Goto, Objectives::from([(Objective, target.clone())]))?,
        ex.leaf(ActionType::Capture, Objectives::from([(Objective, target)]))?,
    ];
    ex.quest(actions)
}

fn kill_hunt(ex: &mut Expansion<'_, '_>) -> Built {
    let target = ex.resolve(Objective, None, &[ENEMIES])?;
    let actions = vec![
        ex.action(ActionType::Goto, Objectives::from([(Objective, target.clone())]))?,
        ex.leaf(ActionType::Kill, Objectives::from([(Objective, target)]))?,
    ];
    ex.quest(actions)
}

fn quest_subquest(ex: &mut Expansion<'_, '_>) -> Built {
    ex.subquest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn tags_are_unique() {
        let mut seen = FxHashSet::default();
        let tags = MOTIVATION_STRATEGIES
            .iter()
            .map(|(_, s)| s.tag)
            .chain(VERB_EXPANSIONS.iter().map(|(_, s)| s.tag));
        for tag in tags {
            assert!(seen.insert(tag), "duplicate tag {}", tag);
        }
    }

    #[test]
    fn comfort_is_deterministic() {
        let comfort: Vec<&str> = MOTIVATION_STRATEGIES
            .iter()
            .filter(|(m, _)| *m == Motivation::Comfort)
            .map(|(_, s)| s.tag)
            .collect();
        assert_eq!(comfort, vec!["kill_pests"]);
    }

    #[test]
    fn expansions_only_for_splittable_verbs() {
        for (verb, strategy) in VERB_EXPANSIONS {
            assert!(!verb.is_terminal(), "{} expands terminal verb {}", strategy.tag, verb);
        }
    }

    #[test]
    fn patterns_are_well_formed() {
        for pattern in PATTERNS {
            assert!(pattern.ends_with("/*"), "{}", pattern);
            assert!(!pattern.starts_with('/'), "{}", pattern);
        }
    }
}

//! Selection, grouping and render order behaviour of a whole scene

use std::collections::HashSet;

use vis_editor::prelude::*;

fn spawn(scene: &mut SceneContext, layer_id: u32, z_index: i32, groups: Vec<GroupId>) -> Entity {
    let mut prototype = EntityPrototype::new()
        .with(PositionComponent::new(0.0, 0.0))
        .with(RenderableComponent::new(z_index))
        .with(LayerComponent::new(layer_id))
        .with(SoundComponent::default());
    if !groups.is_empty() {
        prototype.insert(GroupComponent::from_ids(groups));
    }
    scene.spawn(&prototype).unwrap()
}

fn stack(scene: &SceneContext, entity: Entity) -> Vec<GroupId> {
    scene
        .world
        .get_component::<GroupComponent>(entity)
        .map(|groups| groups.group_ids.clone())
        .unwrap_or_default()
}

#[test]
fn test_free_group_id_exceeds_every_used_id() {
    let mut scene = SceneContext::headless(&["Default"]);
    assert_eq!(GroupProvider::new(&scene.world).free_group_id(), 0);

    spawn(&mut scene, 0, 0, vec![3]);
    spawn(&mut scene, 0, 0, vec![1, 7, 2]);
    spawn(&mut scene, 0, 0, vec![]);
    assert_eq!(GroupProvider::new(&scene.world).free_group_id(), 8);
}

#[test]
fn test_group_ungroup_round_trip() {
    let mut scene = SceneContext::headless(&["Default"]);
    let a = spawn(&mut scene, 0, 0, vec![]);
    let b = spawn(&mut scene, 0, 0, vec![]);
    let c = spawn(&mut scene, 0, 0, vec![]);
    let before: Vec<_> = [a, b, c].iter().map(|e| stack(&scene, *e)).collect();

    scene.select(EntityProxy::Single(a)).unwrap();
    scene.select_append(EntityProxy::Single(b)).unwrap();
    scene.select_append(EntityProxy::Single(c)).unwrap();
    scene.group_selection().unwrap();
    scene.ungroup_selection().unwrap();

    let after: Vec<_> = [a, b, c].iter().map(|e| stack(&scene, *e)).collect();
    assert_eq!(before, after);

    let selected: HashSet<_> = scene.selection.selection().iter().copied().collect();
    let expected: HashSet<_> = [a, b, c].into_iter().map(EntityProxy::Single).collect();
    assert_eq!(selected, expected);
}

#[test]
fn test_locked_layer_leaves_selection_unchanged() {
    let mut scene = SceneContext::headless(&["Background", "Foreground"]);
    let free = spawn(&mut scene, 0, 0, vec![]);
    let locked = spawn(&mut scene, 1, 0, vec![]);
    scene.select(EntityProxy::Single(free)).unwrap();
    scene.scene.layers.layer_mut(1).unwrap().locked = true;

    let before = scene.selection.selection().to_vec();
    scene.select(EntityProxy::Single(locked)).unwrap();
    assert_eq!(scene.selection.selection(), before.as_slice());
    scene.select_append(EntityProxy::Single(locked)).unwrap();
    assert_eq!(scene.selection.selection(), before.as_slice());

    scene.scene.layers.layer_mut(0).unwrap().locked = true;
    scene.select_all().unwrap();
    assert_eq!(scene.selection.selection(), before.as_slice());
}

#[test]
fn test_selection_stays_on_one_layer() {
    let mut scene = SceneContext::headless(&["Background", "Default", "Foreground"]);
    let entities: Vec<Entity> = (0..6).map(|i| spawn(&mut scene, i % 3, 0, vec![])).collect();

    for (step, entity) in entities.iter().enumerate() {
        if step % 2 == 0 {
            scene.select_append(EntityProxy::Single(*entity)).unwrap();
        } else {
            scene.select(EntityProxy::Single(*entity)).unwrap();
        }

        let layers: HashSet<u32> = scene
            .selection
            .selection()
            .iter()
            .map(|proxy| proxy.layer_id(&scene.world).unwrap())
            .collect();
        assert_eq!(layers.len(), 1);
        assert!(layers.contains(&scene.scene.active_layer_id()));
    }
}

#[test]
fn test_render_order_after_registration_changes() {
    let mut scene = SceneContext::headless(&["Background", "Foreground"]);
    let a = spawn(&mut scene, 0, 0, vec![]);
    let c = spawn(&mut scene, 1, -1, vec![]);
    let b = spawn(&mut scene, 0, 5, vec![]);
    let d = spawn(&mut scene, 0, 5, vec![]);
    let e = spawn(&mut scene, 0, 0, vec![]);

    scene.select(EntityProxy::Single(e)).unwrap();
    scene.delete_selected().unwrap();

    let mut batch = RecordingBatch::new();
    scene.render_frame(&mut batch).unwrap();
    assert_eq!(batch.drawn_entities(), vec![a, b, d, c]);

    let keys: Vec<(u32, i32)> = scene.render.jobs().iter().map(|job| (job.layer_id(), job.z_index())).collect();
    assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_group_scenario_allocates_next_id() {
    let mut scene = SceneContext::headless(&["Default"]);
    spawn(&mut scene, 0, 0, vec![4]);
    let a = spawn(&mut scene, 0, 0, vec![]);
    let b = spawn(&mut scene, 0, 0, vec![]);

    scene.select(EntityProxy::Single(a)).unwrap();
    scene.select_append(EntityProxy::Single(b)).unwrap();
    scene.group_selection().unwrap();

    assert_eq!(scene.selection.selection(), &[EntityProxy::Group(5)]);
    let group = GroupProvider::new(&scene.world).group_entity_proxy(5).unwrap();
    let members: HashSet<_> = group.members().iter().copied().collect();
    assert_eq!(members, HashSet::from([EntityProxy::Single(a), EntityProxy::Single(b)]));

    scene.ungroup_selection().unwrap();
    let selected: HashSet<_> = scene.selection.selection().iter().copied().collect();
    assert_eq!(selected, members);
    assert!(scene.world.iter::<GroupComponent>().all(|(_, groups)| !groups.contains(5)));
}

#[test]
fn test_group_undo_redo() {
    let mut scene = SceneContext::headless(&["Default"]);
    let a = spawn(&mut scene, 0, 0, vec![]);
    let b = spawn(&mut scene, 0, 0, vec![]);

    scene.select(EntityProxy::Single(a)).unwrap();
    scene.select_append(EntityProxy::Single(b)).unwrap();
    scene.group_selection().unwrap();
    assert_eq!(scene.undo.undo_name().as_deref(), Some("Group"));

    scene.undo().unwrap();
    assert!(stack(&scene, a).is_empty());
    assert!(scene.selection.selection().is_empty());

    scene.redo().unwrap();
    assert_eq!(stack(&scene, a), vec![0]);
    assert_eq!(stack(&scene, b), vec![0]);
}

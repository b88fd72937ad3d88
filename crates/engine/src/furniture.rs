//! Furniture instance - placement plus its visualization state machine
//!
//! A furniture starts as a placeholder sprite. Once its property table is
//! available it owns one [`LayerAnimationState`] per layer and one sprite per
//! drawn layer (plus a shadow). On each animation tick multi-frame layers
//! advance and re-render; single-frame layers are drawn once and left alone
//! until the state or direction changes.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use isoroom_core::types::Vec3;

use crate::animation::LayerAnimationState;
use crate::bottle::BottleQueue;
use crate::data::{FurnitureAsset, VisualizationKind};
use crate::layer::{build_layer, build_placeholder, build_shadow, LayerInput, LayerSprite, SpriteIds};
use crate::scheduler::SubscriptionHandle;

/// Placement input, as received from the room load message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurniturePlacement {
    pub id: u32,
    #[serde(alias = "baseCatalogId")]
    pub base_id: u32,
    pub position: Vec3,
    #[serde(default)]
    pub direction: u8,
    #[serde(default)]
    pub state: i32,
}

#[derive(Debug, Clone)]
struct Loaded {
    asset: Rc<FurnitureAsset>,
    animations: BTreeMap<u32, LayerAnimationState>,
    sprites: BTreeMap<u32, LayerSprite>,
    shadow: Option<LayerSprite>,
    bottle: Option<BottleQueue>,
}

#[derive(Debug, Clone)]
enum Visualization {
    Placeholder(LayerSprite),
    Loaded(Loaded),
}

#[derive(Debug, Clone)]
pub struct Furniture {
    placement: FurniturePlacement,
    visualization: Visualization,
    pub(crate) subscription: Option<SubscriptionHandle>,
}

impl Furniture {
    pub fn new(placement: FurniturePlacement, ids: &mut SpriteIds) -> Self {
        let placeholder = build_placeholder(placement.position, None, ids);
        Self {
            placement,
            visualization: Visualization::Placeholder(placeholder),
            subscription: None,
        }
    }

    pub fn placement(&self) -> &FurniturePlacement {
        &self.placement
    }

    pub fn id(&self) -> u32 {
        self.placement.id
    }

    pub fn base_id(&self) -> u32 {
        self.placement.base_id
    }

    pub fn state(&self) -> i32 {
        self.placement.state
    }

    pub fn direction(&self) -> u8 {
        self.placement.direction
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.visualization, Visualization::Placeholder(_))
    }

    /// Animation cursor of `layer`, once loaded.
    pub fn layer_animation(&self, layer: u32) -> Option<&LayerAnimationState> {
        match &self.visualization {
            Visualization::Loaded(l) => l.animations.get(&layer),
            Visualization::Placeholder(_) => None,
        }
    }

    pub fn layer_sprite(&self, layer: u32) -> Option<&LayerSprite> {
        match &self.visualization {
            Visualization::Loaded(l) => l.sprites.get(&layer),
            Visualization::Placeholder(_) => None,
        }
    }

    /// Every sprite currently drawn, shadow first.
    pub fn sprites(&self) -> Vec<&LayerSprite> {
        match &self.visualization {
            Visualization::Placeholder(p) => vec![p],
            Visualization::Loaded(l) => l.shadow.iter().chain(l.sprites.values()).collect(),
        }
    }

    /// Swap the placeholder for the real layers.
    pub fn load(&mut self, asset: Rc<FurnitureAsset>, ids: &mut SpriteIds, verbose: bool) {
        let bottle = (asset.property.kind() == VisualizationKind::Bottle).then(BottleQueue::new);
        self.visualization = Visualization::Loaded(Loaded {
            asset,
            animations: BTreeMap::new(),
            sprites: BTreeMap::new(),
            shadow: None,
            bottle,
        });
        if verbose {
            eprintln!("[Furniture] {} loaded (base {})", self.placement.id, self.placement.base_id);
        }
        self.refresh(ids, verbose);
    }

    /// Request a new state; bottles may queue it instead.
    pub fn set_state(&mut self, state: i32, ids: &mut SpriteIds, verbose: bool) {
        let immediate = match &mut self.visualization {
            Visualization::Loaded(Loaded {
                bottle: Some(queue),
                ..
            }) => queue.request(state),
            _ => Some(state),
        };
        if let Some(state) = immediate {
            self.placement.state = state;
            self.refresh(ids, verbose);
        }
    }

    pub fn set_direction(&mut self, direction: u8, ids: &mut SpriteIds, verbose: bool) {
        self.placement.direction = direction;
        self.refresh(ids, verbose);
    }

    pub fn set_position(&mut self, position: Vec3, ids: &mut SpriteIds, verbose: bool) {
        self.placement.position = position;
        self.refresh(ids, verbose);
    }

    /// Reset every layer's animation and redraw all layers.
    fn refresh(&mut self, ids: &mut SpriteIds, verbose: bool) {
        let placement = &mut self.placement;
        let loaded = match &mut self.visualization {
            Visualization::Placeholder(p) => {
                *p = build_placeholder(placement.position, Some(&*p), ids);
                return;
            }
            Visualization::Loaded(l) => l,
        };

        let vis = &loaded.asset.property.visualization;
        if loaded.asset.property.kind().requires_known_state() && !vis.has_state(placement.state) {
            if let Some(first) = vis.first_state() {
                if verbose {
                    eprintln!(
                        "[Furniture] {} has no state {}, using {}",
                        placement.id, placement.state, first
                    );
                }
                placement.state = first;
            }
        }
        placement.direction = vis.resolve_direction(placement.direction);

        loaded.animations.clear();
        for layer in 0..vis.layer_count {
            let sequence = vis
                .frame_sequence(placement.state, layer)
                .map(<[u32]>::to_vec)
                .unwrap_or_default();
            loaded.animations.insert(layer, LayerAnimationState::new(sequence));
        }

        let name = loaded.asset.base_name().to_string();
        let previous = loaded.shadow.take();
        loaded.shadow = Some(build_shadow(
            &name,
            placement.direction,
            placement.position,
            previous.as_ref(),
            ids,
        ));
        for layer in 0..vis.layer_count {
            render_layer(loaded, placement, layer, ids);
        }
    }

    /// One animation tick. Returns whether any sprite changed.
    pub fn tick(&mut self, ids: &mut SpriteIds, verbose: bool) -> bool {
        let next_state = match &mut self.visualization {
            Visualization::Placeholder(_) => return false,
            Visualization::Loaded(l) => match l.bottle.as_mut() {
                Some(queue) => {
                    let played = l
                        .animations
                        .get(&0)
                        .map_or(true, LayerAnimationState::last_frame_played);
                    queue.next(played)
                }
                None => None,
            },
        };
        if let Some(state) = next_state {
            self.placement.state = state;
            self.refresh(ids, verbose);
        }

        let Visualization::Loaded(loaded) = &mut self.visualization else {
            return false;
        };
        let mut changed = next_state.is_some();
        let layers: Vec<u32> = loaded.animations.keys().copied().collect();
        for layer in layers {
            let advanced = loaded
                .animations
                .get_mut(&layer)
                .map_or(false, LayerAnimationState::advance);
            if advanced || !loaded.sprites.contains_key(&layer) {
                render_layer(loaded, &self.placement, layer, ids);
                changed = true;
            }
        }
        changed
    }
}

fn render_layer(loaded: &mut Loaded, placement: &FurniturePlacement, layer: u32, ids: &mut SpriteIds) {
    let vis = &loaded.asset.property.visualization;
    let frame = loaded
        .animations
        .get(&layer)
        .map_or(0, LayerAnimationState::frame_value);
    let tint = loaded.asset.color().and_then(|c| vis.tint(c, layer));
    let input = LayerInput {
        name: loaded.asset.base_name(),
        layer,
        direction: placement.direction,
        frame,
        position: placement.position,
        data: vis.layer(layer),
        tint,
    };
    let sprite = build_layer(input, loaded.sprites.get(&layer), ids);
    loaded.sprites.insert(layer, sprite);
}

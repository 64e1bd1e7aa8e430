use crate::{
    RegionId, StreetEdgeId,
    algo::{Orientation, compute_contiguous_chains, orient_new_edge},
    model::{Route, RouteEdge, SelectionState, StreetEdge, StreetGraph},
};

/// Input handled by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The user clicked a street
    Select(StreetEdgeId),
    /// The user cleared the route
    Reset,
}

/// Why a click left the route unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The street belongs to another neighborhood than the route
    OtherRegion {
        active: RegionId,
        clicked: RegionId,
    },
    /// The id is not part of the loaded graph
    UnknownStreet,
}

/// Effect of one event on the route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `NotChosen -> Chosen`; `reversed` is set when the edge was flipped to
    /// extend an existing chain
    Added {
        street_id: StreetEdgeId,
        reversed: bool,
    },
    /// `Chosen -> ChosenReversed`
    Flipped { street_id: StreetEdgeId },
    /// `ChosenReversed -> NotChosen`
    Removed { street_id: StreetEdgeId },
    Rejected {
        street_id: StreetEdgeId,
        reason: RejectReason,
    },
    Cleared,
}

impl Transition {
    /// Whether the route's membership or orientation may have changed
    pub fn changes_route(&self) -> bool {
        !matches!(self, Transition::Rejected { .. })
    }
}

/// Owner of the route and of every edge's selection state
///
/// Chains are recomputed from the route whenever they are needed; the machine
/// keeps no partition of its own.
#[derive(Debug, Clone)]
pub struct SelectionStateMachine {
    route: Route,
    tolerance_m: f64,
}

impl SelectionStateMachine {
    pub fn new(tolerance_m: f64) -> Self {
        Self {
            route: Route::new(),
            tolerance_m,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn active_region(&self) -> Option<RegionId> {
        self.route.active_region()
    }

    pub fn state_of(&self, id: StreetEdgeId) -> SelectionState {
        self.route.state_of(id)
    }

    /// Whether a click on `edge` would be accepted under the region lock
    pub fn is_selectable(&self, edge: &StreetEdge) -> bool {
        self.route
            .active_region()
            .is_none_or(|active| active == edge.region_id())
    }

    pub fn apply(&mut self, event: SelectionEvent, graph: &StreetGraph) -> Transition {
        match event {
            SelectionEvent::Select(id) => self.select(id, graph),
            SelectionEvent::Reset => self.reset(),
        }
    }

    /// Advances the clicked edge one step through
    /// `NotChosen -> Chosen -> ChosenReversed -> NotChosen`.
    pub fn select(&mut self, id: StreetEdgeId, graph: &StreetGraph) -> Transition {
        let transition = match self.route.state_of(id) {
            SelectionState::NotChosen => self.add(id, graph),
            SelectionState::Chosen => self.flip(id),
            SelectionState::ChosenReversed => self.remove(id),
        };
        log::debug!("Street {id}: {transition:?}");
        transition
    }

    /// Drops every edge and releases the region lock
    pub fn reset(&mut self) -> Transition {
        self.route.clear();
        Transition::Cleared
    }

    fn add(&mut self, id: StreetEdgeId, graph: &StreetGraph) -> Transition {
        let Some(edge) = graph.edge(id) else {
            return Transition::Rejected {
                street_id: id,
                reason: RejectReason::UnknownStreet,
            };
        };

        if let Some(active) = self.route.active_region()
            && active != edge.region_id()
        {
            return Transition::Rejected {
                street_id: id,
                reason: RejectReason::OtherRegion {
                    active,
                    clicked: edge.region_id(),
                },
            };
        }

        let orientation = if self.route.is_empty() {
            Orientation::Keep
        } else {
            let chains = compute_contiguous_chains(self.route.edges(), self.tolerance_m);
            orient_new_edge(edge, &chains, self.tolerance_m)
        };

        let mut route_edge = RouteEdge::new(edge.clone());
        let reversed = orientation == Orientation::Reverse;
        if reversed {
            route_edge.reverse();
        }
        self.route.push(route_edge);

        Transition::Added {
            street_id: id,
            reversed,
        }
    }

    fn flip(&mut self, id: StreetEdgeId) -> Transition {
        if let Some(edge) = self.route.get_mut(id) {
            edge.reverse();
            edge.set_state(SelectionState::ChosenReversed);
        }
        Transition::Flipped { street_id: id }
    }

    fn remove(&mut self, id: StreetEdgeId) -> Transition {
        self.route.remove(id);
        Transition::Removed { street_id: id }
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::PROXIMITY_TOLERANCE_M;

    const P1: (f64, f64) = (0.000, 0.0);
    const P2: (f64, f64) = (0.001, 0.0);
    const P3: (f64, f64) = (0.002, 0.0);

    fn street(id: StreetEdgeId, region_id: RegionId, from: (f64, f64), to: (f64, f64)) -> StreetEdge {
        let geometry = line_string![(x: from.0, y: from.1), (x: to.0, y: to.1)];
        StreetEdge::new(id, region_id, geometry).unwrap()
    }

    fn graph() -> StreetGraph {
        StreetGraph::new(
            vec![
                street(1, 7, P1, P2),
                street(2, 7, P3, P2),
                street(3, 8, P2, P3),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn first_add_locks_region() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);

        let transition = machine.select(1, &graph);
        assert_eq!(
            transition,
            Transition::Added {
                street_id: 1,
                reversed: false
            }
        );
        assert_eq!(machine.active_region(), Some(7));
        assert_eq!(machine.state_of(1), SelectionState::Chosen);
    }

    #[test]
    fn rejects_other_region_without_change() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);
        machine.select(1, &graph);
        let before = machine.route().clone();

        let transition = machine.select(3, &graph);
        assert_eq!(
            transition,
            Transition::Rejected {
                street_id: 3,
                reason: RejectReason::OtherRegion {
                    active: 7,
                    clicked: 8
                }
            }
        );
        assert!(!transition.changes_route());
        assert_eq!(machine.route(), &before);
        assert!(!machine.is_selectable(graph.edge(3).unwrap()));
        assert!(machine.is_selectable(graph.edge(2).unwrap()));
    }

    #[test]
    fn rejects_unknown_street() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);

        assert_eq!(
            machine.select(42, &graph),
            Transition::Rejected {
                street_id: 42,
                reason: RejectReason::UnknownStreet
            }
        );
        assert!(machine.route().is_empty());
        assert_eq!(machine.active_region(), None);
    }

    #[test]
    fn added_edge_is_oriented_to_extend_the_route() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);
        machine.select(1, &graph);

        assert_eq!(
            machine.select(2, &graph),
            Transition::Added {
                street_id: 2,
                reversed: true
            }
        );
        let added = machine.route().get(2).unwrap();
        assert_eq!(added.state(), SelectionState::Chosen);
        assert!(added.reversed_from_source());
        assert_eq!(added.start(), graph.edge(2).unwrap().end());

        // the base graph keeps the source orientation
        assert_eq!(graph.edge(2).unwrap().start().x, P3.0);
    }

    #[test]
    fn full_click_cycle_restores_source_and_region() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);
        let source = graph.edge(1).unwrap().geometry().clone();

        machine.select(1, &graph);
        assert_eq!(
            machine.select(1, &graph),
            Transition::Flipped { street_id: 1 }
        );
        let flipped = machine.route().get(1).unwrap();
        assert_eq!(flipped.state(), SelectionState::ChosenReversed);
        assert!(flipped.reversed_from_source());
        assert_eq!(flipped.start(), graph.edge(1).unwrap().end());

        assert_eq!(
            machine.select(1, &graph),
            Transition::Removed { street_id: 1 }
        );
        assert_eq!(machine.state_of(1), SelectionState::NotChosen);
        assert_eq!(machine.active_region(), None);

        // re-adding starts from the source orientation again
        machine.select(1, &graph);
        assert_eq!(machine.route().get(1).unwrap().geometry(), &source);
    }

    #[test]
    fn flip_keeps_position() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);
        machine.select(1, &graph);
        machine.select(2, &graph);
        machine.select(1, &graph);

        assert_eq!(machine.route().street_ids(), vec![1, 2]);
    }

    #[test]
    fn reset_clears_route_and_lock() {
        let graph = graph();
        let mut machine = SelectionStateMachine::new(PROXIMITY_TOLERANCE_M);
        machine.select(1, &graph);
        machine.select(2, &graph);

        assert_eq!(machine.apply(SelectionEvent::Reset, &graph), Transition::Cleared);
        assert!(machine.route().is_empty());
        assert_eq!(machine.active_region(), None);
        assert!(machine.is_selectable(graph.edge(3).unwrap()));
    }
}

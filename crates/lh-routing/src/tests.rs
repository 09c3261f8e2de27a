//! Unit tests for lh-routing.
//!
//! Networks are small hand-built grids over central Lisbon.

#[cfg(test)]
mod helpers {
    use lh_core::{Coord, GeoPoint, Timestamp, TravelMode, parse_timestamp};
    use lh_spatial::{RoadNetwork, RoadNetworkBuilder};

    use crate::{Route, TravelRequest};

    pub const STEP: f64 = 0.005;

    /// Coordinate of the node nobody can reach in either network.
    pub const ISOLATED: (f64, f64) = (38.800, -9.200);

    /// 4×4 grid of measured two-way roads starting at `(lat0, lon0)`, plus
    /// one node with no edges at [`ISOLATED`].
    fn grid(lat0: f64, lon0: f64) -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let mut ids = [[lh_core::NodeId::INVALID; 4]; 4];
        for (i, row) in ids.iter_mut().enumerate() {
            for (j, id) in row.iter_mut().enumerate() {
                *id = b.add_node(Coord::new(lat0 + STEP * i as f64, lon0 + STEP * j as f64));
            }
        }
        for i in 0..4 {
            for j in 0..4 {
                if i + 1 < 4 {
                    b.add_measured_road(ids[i][j], ids[i + 1][j]);
                }
                if j + 1 < 4 {
                    b.add_measured_road(ids[i][j], ids[i][j + 1]);
                }
            }
        }
        b.add_node(Coord::new(ISOLATED.0, ISOLATED.1));
        b.build()
    }

    /// Vehicular grid: nodes on round 0.005° multiples from (38.700, -9.150).
    pub fn drive_network() -> RoadNetwork {
        grid(38.700, -9.150)
    }

    /// Pedestrian grid, offset from the drive grid so the two node sets
    /// never coincide.
    pub fn walk_network() -> RoadNetwork {
        grid(38.7005, -9.1505)
    }

    pub fn ts(text: &str) -> Timestamp {
        parse_timestamp(text).unwrap()
    }

    pub fn point(label: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::parse(&format!("{label}:{lat},{lon}")).unwrap()
    }

    pub fn request(mode: TravelMode, start: GeoPoint, end: GeoPoint) -> TravelRequest {
        TravelRequest::classified(mode, ts("2024-03-02T10:00:00Z"), start, end)
    }

    /// A mixed batch: every grid-cell pair in both modes, plus two requests
    /// starting at the isolated node.
    pub fn mixed_batch() -> Vec<TravelRequest> {
        let mut out = Vec::new();
        let mut minute = 0;
        for i in 0..4 {
            for j in 0..4 {
                let mode = if (i + j) % 2 == 0 { TravelMode::Walking } else { TravelMode::Driving };
                let start = point("s", 38.701 + STEP * i as f64, -9.149 + STEP * j as f64);
                let end = point("e", 38.714 - STEP * j as f64, -9.136 - STEP * i as f64);
                let time = ts(&format!("2024-03-02T10:{minute:02}:00Z"));
                minute += 1;
                out.push(TravelRequest::classified(mode, time, start, end));
            }
        }
        for mode in [TravelMode::Walking, TravelMode::Driving] {
            out.push(request(mode, point("x", ISOLATED.0, ISOLATED.1), point("y", 38.705, -9.145)));
        }
        out
    }

    /// Order-insensitive view of a route set.
    pub fn sorted(mut routes: Vec<Route>) -> Vec<Route> {
        routes.sort_by(|a, b| {
            (a.time, a.start.encoded(), a.end.encoded(), &a.label)
                .cmp(&(b.time, b.start.encoded(), b.end.encoded(), &b.label))
        });
        routes
    }
}

// ── Route computer ────────────────────────────────────────────────────────────

#[cfg(test)]
mod compute {
    use lh_core::{Coord, TravelMode};
    use lh_spatial::{DijkstraRouter, RoadNetwork};

    use super::helpers::*;
    use crate::{Resolvers, RouteErrorKind, compute_route};

    #[test]
    fn driving_request_snaps_and_preserves_fields() {
        // Scenario A.
        let (walk, drive) = (walk_network(), drive_network());
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(
            TravelMode::Driving,
            point("A", 38.700, -9.150),
            point("B", 38.710, -9.140),
        );

        let route = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap();

        assert_eq!(route.label, "in a passenger vehicle");
        assert_eq!(route.mode, TravelMode::Driving);
        assert_eq!(route.time, req.time);
        assert_eq!(route.start.encoded(), "A:38.7,-9.15");
        assert_eq!(route.end, req.end);
        assert!(!route.coords.is_empty());

        let first = route.coords[0];
        let last = *route.coords.last().unwrap();
        assert!(first.distance_m(Coord::new(38.700, -9.150)) < 50.0);
        assert!(last.distance_m(Coord::new(38.710, -9.140)) < 50.0);
        // Manhattan grid: 2 steps north + 2 steps east.
        assert_eq!(route.coords.len(), 5);
    }

    #[test]
    fn walking_request_uses_walk_network() {
        let (walk, drive) = (walk_network(), drive_network());
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(
            TravelMode::Walking,
            point("A", 38.700, -9.150),
            point("B", 38.710, -9.140),
        );

        let route = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap();

        for c in &route.coords {
            assert!(walk.node_pos.contains(c));
            assert!(!drive.node_pos.contains(c));
        }
        assert_eq!(resolvers.walk.searches(), 2);
        assert_eq!(resolvers.drive.searches(), 0);
    }

    #[test]
    fn coords_are_snapped_endpoints_in_order() {
        let (walk, drive) = (walk_network(), drive_network());
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(
            TravelMode::Driving,
            point("A", 38.7149, -9.1351),
            point("B", 38.7001, -9.1499),
        );

        let route = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap();

        let start_node = drive.snap_to_node(req.start.coord()).unwrap();
        let end_node = drive.snap_to_node(req.end.coord()).unwrap();
        assert_eq!(route.coords[0], drive.node_pos[start_node.index()]);
        assert_eq!(*route.coords.last().unwrap(), drive.node_pos[end_node.index()]);
    }

    #[test]
    fn same_snapped_node_gives_single_coordinate() {
        let (walk, drive) = (walk_network(), drive_network());
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(
            TravelMode::Driving,
            point("A", 38.7001, -9.1501),
            point("B", 38.6999, -9.1499),
        );
        let route = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap();
        assert_eq!(route.coords, vec![Coord::new(38.700, -9.150)]);
    }

    #[test]
    fn isolated_start_is_no_path_found() {
        // Scenario D, single request.
        let (walk, drive) = (walk_network(), drive_network());
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(
            TravelMode::Driving,
            point("X", ISOLATED.0, ISOLATED.1),
            point("B", 38.710, -9.140),
        );
        let err = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap_err();
        assert_eq!(err.kind, RouteErrorKind::NoPathFound);
        assert_eq!(err.label, req.label);
        assert_eq!(err.time, req.time);
        assert_eq!(err.start, "X:38.8,-9.2");
        assert_eq!(err.end, req.end.encoded());
    }

    #[test]
    fn empty_network_is_reported_not_panicked() {
        let walk = RoadNetwork::empty();
        let drive = drive_network();
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(TravelMode::Walking, point("A", 38.7, -9.15), point("B", 38.71, -9.14));
        let err = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap_err();
        assert_eq!(err.kind, RouteErrorKind::EmptyNetwork);
    }

    #[test]
    fn repeated_endpoints_hit_the_cache() {
        let (walk, drive) = (walk_network(), drive_network());
        let mut resolvers = Resolvers::new(&walk, &drive);
        let req = request(TravelMode::Driving, point("A", 38.7, -9.15), point("B", 38.71, -9.14));
        let first = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap();
        let second = compute_route(&req, &mut resolvers, &DijkstraRouter).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolvers.drive.searches(), 2);
    }
}

// ── Activity requests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod request {
    use lh_core::TravelMode;
    use lh_input::ActivityRecord;

    use super::helpers::*;
    use crate::TravelRequest;

    fn activity(kind: &str) -> ActivityRecord {
        ActivityRecord {
            start_time:    ts("2024-03-02T10:00:00Z"),
            end_time:      ts("2024-03-02T10:30:00Z"),
            activity_type: kind.to_owned(),
            start:         point("geo", 38.70, -9.15),
            end:           point("geo", 38.71, -9.14),
        }
    }

    #[test]
    fn declared_type_kept_verbatim() {
        let req = TravelRequest::from_activity(&activity("WALKING"));
        assert_eq!(req.mode, TravelMode::Walking);
        assert_eq!(req.label, "WALKING");

        let req = TravelRequest::from_activity(&activity("cycling"));
        assert_eq!(req.mode, TravelMode::Driving);
        assert_eq!(req.label, "cycling");
        assert_eq!(req.time, ts("2024-03-02T10:00:00Z"));
    }
}

// ── Transition classifier ─────────────────────────────────────────────────────

#[cfg(test)]
mod classify {
    use lh_core::{TravelMode, straight_line_distance_km};
    use lh_input::{PathPoint, TimelinePoint};

    use super::helpers::*;
    use crate::{DRIVING_THRESHOLD_KM, RouteErrorKind, RouteFailure, classify, mode_for_distance, transitions};

    fn tp(time: &str, lat: f64, lon: f64) -> TimelinePoint {
        TimelinePoint { time: ts(time), point: point("geo", lat, lon).into() }
    }

    fn bad(time: &str, text: &str) -> TimelinePoint {
        TimelinePoint { time: ts(time), point: PathPoint::parse(text) }
    }

    #[test]
    fn half_km_walks_and_two_point_three_km_drives() {
        // Scenario B.  0.0045° latitude ≈ 0.50 km, 0.0207° ≈ 2.30 km.
        let a = tp("2024-03-02T10:00:00Z", 38.7000, -9.15);
        let near = tp("2024-03-02T10:05:00Z", 38.7045, -9.15);
        let far = tp("2024-03-02T10:05:00Z", 38.7207, -9.15);

        let walk = classify(&a, &near).unwrap();
        assert_eq!(walk.mode, TravelMode::Walking);
        assert_eq!(walk.label, "walking");

        let drive = classify(&a, &far).unwrap();
        assert_eq!(drive.mode, TravelMode::Driving);
        assert_eq!(drive.label, "in a passenger vehicle");
    }

    #[test]
    fn exact_threshold_walks() {
        assert_eq!(mode_for_distance(DRIVING_THRESHOLD_KM), TravelMode::Walking);
        assert_eq!(mode_for_distance(1.000_000_001), TravelMode::Driving);
        assert_eq!(mode_for_distance(0.0), TravelMode::Walking);
    }

    #[test]
    fn driving_iff_over_threshold() {
        let a = tp("2024-03-02T10:00:00Z", 38.70, -9.15);
        for k in 0..40 {
            let b = tp("2024-03-02T10:01:00Z", 38.70 + 0.0005 * k as f64, -9.15);
            let d = straight_line_distance_km(a.point.valid().unwrap(), b.point.valid().unwrap());
            let expected = if d > 1.0 { TravelMode::Driving } else { TravelMode::Walking };
            assert_eq!(classify(&a, &b).unwrap().mode, expected, "d = {d}");
        }
    }

    #[test]
    fn uses_earlier_time_and_both_points() {
        let a = tp("2024-03-02T10:00:00Z", 38.70, -9.15);
        let b = tp("2024-03-02T11:00:00Z", 38.71, -9.14);
        let req = classify(&a, &b).unwrap();
        assert_eq!(req.time, a.time);
        assert_eq!(Some(&req.start), a.point.valid());
        assert_eq!(Some(&req.end), b.point.valid());
    }

    #[test]
    fn malformed_endpoint_is_malformed_input() {
        let a = tp("2024-03-02T10:00:00Z", 38.70, -9.15);
        let b = bad("2024-03-02T10:00:00Z", "geo:oops");

        for (from, to) in [(&a, &b), (&b, &a)] {
            let err = classify(from, to).unwrap_err();
            assert_eq!(err.kind, RouteErrorKind::MalformedInput);
            assert!(matches!(err.source, RouteFailure::Point(_)));
            assert_eq!(err.time, from.time);
            assert_eq!(err.start, from.point.encoded());
            assert_eq!(err.end, to.point.encoded());
        }
    }

    #[test]
    fn transitions_pair_adjacent_points() {
        let points = vec![
            tp("2024-03-02T10:00:00Z", 38.700, -9.15),
            tp("2024-03-02T10:00:00Z", 38.701, -9.15),
            tp("2024-03-02T11:00:00Z", 38.750, -9.15),
        ];
        let t = transitions(&points);
        assert_eq!(t.len(), 2);
        assert!(t.rejected.is_empty());
        assert_eq!(t.requests[0].mode, TravelMode::Walking);
        assert_eq!(t.requests[1].mode, TravelMode::Driving);
        assert_eq!(Some(&t.requests[1].start), points[1].point.valid());

        assert!(transitions(&points[..1]).is_empty());
        assert!(transitions(&[]).is_empty());
    }

    #[test]
    fn malformed_slot_fails_both_neighbouring_transitions() {
        let points = vec![
            tp("2024-03-02T10:00:00Z", 38.700, -9.150),
            bad("2024-03-02T10:00:00Z", "geo:oops"),
            tp("2024-03-02T10:00:00Z", 38.715, -9.135),
            tp("2024-03-02T10:00:00Z", 38.716, -9.135),
        ];
        let t = transitions(&points);
        assert_eq!(t.len(), 3);
        assert_eq!(t.rejected.len(), 2);
        assert!(t.rejected.iter().all(|e| e.kind == RouteErrorKind::MalformedInput));
        assert_eq!(t.rejected[0].end, "geo:oops");
        assert_eq!(t.rejected[1].start, "geo:oops");

        // No request bridges the gap.
        assert_eq!(t.requests.len(), 1);
        assert_eq!(Some(&t.requests[0].start), points[2].point.valid());
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use lh_spatial::DijkstraRouter;

    use super::helpers::*;
    use crate::{BatchError, Execution, RouteErrorKind, run_batch, run_parallel, run_sequential};

    #[test]
    fn empty_batch() {
        // Scenario C.
        let (walk, drive) = (walk_network(), drive_network());
        let seq = run_sequential(&[], &walk, &drive, &DijkstraRouter);
        let par = run_parallel(&[], &walk, &drive, &DijkstraRouter, 4).unwrap();
        for outcome in [seq, par] {
            assert_eq!(outcome.requested, 0);
            assert!(outcome.routes.is_empty());
            assert!(outcome.failures.is_empty());
        }
    }

    #[test]
    fn isolated_requests_dropped_rest_intact() {
        // Scenario D, in a batch.
        let (walk, drive) = (walk_network(), drive_network());
        let batch = mixed_batch();
        let outcome = run_parallel(&batch, &walk, &drive, &DijkstraRouter, 3).unwrap();

        assert_eq!(outcome.requested, batch.len());
        assert_eq!(outcome.produced(), batch.len() - 2);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures_by_kind().get(&RouteErrorKind::NoPathFound), Some(&2));
        for f in &outcome.failures {
            assert!(f.start.starts_with("x:"), "{}", f.start);
        }
    }

    #[test]
    fn parallel_matches_sequential_for_any_worker_count() {
        let (walk, drive) = (walk_network(), drive_network());
        let batch = mixed_batch();
        let expected = sorted(run_sequential(&batch, &walk, &drive, &DijkstraRouter).routes);

        for workers in [1, 2, 4, 8] {
            let outcome = run_parallel(&batch, &walk, &drive, &DijkstraRouter, workers).unwrap();
            assert_eq!(sorted(outcome.routes), expected, "workers = {workers}");
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (walk, drive) = (walk_network(), drive_network());
        let batch = mixed_batch();
        let a = run_batch(&batch, &walk, &drive, &DijkstraRouter, Execution::Parallel { max_workers: 4 }).unwrap();
        let b = run_batch(&batch, &walk, &drive, &DijkstraRouter, Execution::Parallel { max_workers: 4 }).unwrap();
        assert_eq!(sorted(a.routes), sorted(b.routes));
        assert_eq!(a.failures.len(), b.failures.len());
    }

    #[test]
    fn zero_workers_rejected() {
        let (walk, drive) = (walk_network(), drive_network());
        let err = run_parallel(&mixed_batch(), &walk, &drive, &DijkstraRouter, 0).unwrap_err();
        assert!(matches!(err, BatchError::ZeroWorkers));
    }

    #[test]
    fn rejected_requests_count_as_requested_and_dropped() {
        let (walk, drive) = (walk_network(), drive_network());
        let points = vec![
            lh_input::TimelinePoint { time: ts("2024-03-02T10:00:00Z"), point: point("geo", 38.700, -9.150).into() },
            lh_input::TimelinePoint { time: ts("2024-03-02T10:00:00Z"), point: lh_input::PathPoint::parse("geo:oops") },
            lh_input::TimelinePoint { time: ts("2024-03-02T10:00:00Z"), point: point("geo", 38.715, -9.135).into() },
        ];
        let crate::Transitions { requests, rejected } = crate::transitions(&points);
        assert!(requests.is_empty());

        let mut outcome = run_parallel(&requests, &walk, &drive, &DijkstraRouter, 2).unwrap();
        outcome.absorb_rejected(rejected);

        assert_eq!(outcome.requested, 2);
        assert_eq!(outcome.produced(), 0);
        assert_eq!(outcome.failures_by_kind().get(&RouteErrorKind::MalformedInput), Some(&2));
    }

    #[test]
    fn every_route_is_non_empty() {
        let (walk, drive) = (walk_network(), drive_network());
        let outcome = run_batch(&mixed_batch(), &walk, &drive, &DijkstraRouter, Execution::Sequential).unwrap();
        assert!(outcome.routes.iter().all(|r| !r.coords.is_empty()));
    }
}

use crate::core::models::atom::Atom;
use crate::core::models::element::ElementTable;
use crate::core::models::structure::Structure;
use crate::core::models::topology::Contact;
use crate::core::utils::geometry::to_array;
use crate::engine::config::{ContactSearch, TopologyConfig};
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use kiddo::{KdTree, SquaredEuclidean};
use tracing::{debug, instrument};

/// Relative padding on the k-d tree query radius so that rounding in the tree's own
/// distance arithmetic never drops a pair the exact test would accept.
const QUERY_RADIUS_PADDING: f64 = 1e-9;

/// Squared-distance threshold for a pair with radii `r_a` and `r_b`.
#[inline]
pub fn contact_threshold(scale: f64, r_a: f64, r_b: f64) -> f64 {
    scale * (r_a + r_b).powi(2)
}

/// Infers non-bonded contacts from interatomic distance and element radii.
///
/// A pair `(i, j)` is a contact when its squared distance in parsed coordinates is
/// strictly below `contact_scale * (r_i + r_j)^2`. The result is sorted by `(i, j)` and
/// holds each unordered pair at most once, whatever search strategy is configured.
#[instrument(skip_all, name = "contact_inference_task")]
pub fn run(
    structure: &Structure,
    elements: &ElementTable,
    config: &TopologyConfig,
    reporter: &ProgressReporter,
) -> Vec<Contact> {
    let atoms = structure.atoms();
    let radii: Vec<f64> = atoms.iter().map(|a| elements.radius(a.element)).collect();

    reporter.report(Progress::TaskStart {
        total_steps: atoms.len() as u64,
    });

    let is_contact = |i: usize, j: usize| {
        atoms[i].distance_squared(&atoms[j])
            < contact_threshold(config.contact_scale, radii[i], radii[j])
    };

    let mut contacts: Vec<Contact> = match config.contact_search {
        ContactSearch::AllPairs => {
            let mut found = Vec::new();
            for i in 0..atoms.len() {
                found.extend(
                    (i + 1..atoms.len())
                        .filter(|&j| is_contact(i, j))
                        .map(|j| Contact::new(i, j)),
                );
                reporter.report(Progress::TaskIncrement);
            }
            found
        }
        ContactSearch::KdTree => search_kd_tree(structure, elements, config, reporter, is_contact),
    };

    reporter.report(Progress::TaskFinish);

    contacts.sort_unstable();
    debug!(
        num_atoms = atoms.len(),
        num_contacts = contacts.len(),
        search = %config.contact_search,
        "Contact inference complete."
    );
    contacts
}

/// Bit pattern of a position, with `-0.0` folded into `0.0`.
fn position_key(atom: &Atom) -> [u64; 3] {
    to_array(&atom.position).map(|v| (v + 0.0).to_bits())
}

/// Radius search over the distinct positions of the structure.
///
/// The tree holds one point per distinct position and each point maps back to every
/// atom sitting there, so any number of coincident atoms can be searched.
fn search_kd_tree(
    structure: &Structure,
    elements: &ElementTable,
    config: &TopologyConfig,
    reporter: &ProgressReporter,
    is_contact: impl Fn(usize, usize) -> bool,
) -> Vec<Contact> {
    let atoms = structure.atoms();
    if atoms.len() < 2 {
        for _ in 0..atoms.len() {
            reporter.report(Progress::TaskIncrement);
        }
        return Vec::new();
    }

    let mut sites: Vec<Vec<usize>> = (0..atoms.len())
        .into_group_map_by(|&i| position_key(&atoms[i]))
        .into_values()
        .collect();
    sites.sort_unstable_by_key(|members| members[0]);

    let points: Vec<[f64; 3]> = sites
        .iter()
        .map(|members| to_array(&atoms[members[0]].position))
        .collect();
    let kdtree: KdTree<f64, 3> = (&points).into();

    let max_radius = elements.max_radius();
    let reach_sq =
        contact_threshold(config.contact_scale, max_radius, max_radius) * (1.0 + QUERY_RADIUS_PADDING);

    let mut found = Vec::new();
    for (site, members) in sites.iter().enumerate() {
        for neighbour in kdtree.within_unsorted::<SquaredEuclidean>(&points[site], reach_sq) {
            let other = neighbour.item as usize;
            if other < site {
                continue;
            }
            found.extend(
                members
                    .iter()
                    .cartesian_product(&sites[other])
                    .filter(|&(&i, &j)| (other > site || i < j) && is_contact(i, j))
                    .map(|(&i, &j)| Contact::new(i, j)),
            );
        }
        for _ in members {
            reporter.report(Progress::TaskIncrement);
        }
    }
    found
}

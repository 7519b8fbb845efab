use rand::Rng;

/// One decision per cell per generation. Never stored in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Kill,
    BecomeAlive,
    Keep,
}

impl Rule {
    /// Threshold table over a neighbour count in 0..=8. Count 2 keeps the
    /// cell's current state whether it is live or dead, so this is not the
    /// classic B3/S23 rule.
    #[inline]
    pub fn decide(neighbours: usize) -> Self {
        if neighbours >= 4 || neighbours <= 1 {
            Rule::Kill
        } else if neighbours == 3 {
            Rule::BecomeAlive
        } else {
            Rule::Keep
        }
    }
}

/// A square matrix of cell states for one generation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    size: usize,
    data: Vec<Vec<bool>>,
}

impl Grid {

    #[inline]
    pub fn new(data: Vec<Vec<bool>>) -> Self {
        let size = data.len();

        if !data.iter().all(|v| v.len() == size) {
            panic!("All rows of the matrix should be same size as the column count!");
        }

        Grid {
            size,
            data,
        }
    }

    /// Uniform random fill: each cell independently live with probability 1/2.
    pub fn random(size: usize, rng: &mut impl Rng) -> Self {
        let data = (0..size)
            .map(|_| (0..size).map(|_| rng.gen_bool(0.5)).collect())
            .collect();

        Grid {
            size,
            data,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn rows(&self) -> &Vec<Vec<bool>> {
        &self.data
    }

    #[inline]
    fn get(&self, i: i32, j: i32) -> Option<bool> {
        if i >= self.size as i32 || j >= self.size as i32 || i < 0 || j < 0 {
            None
        } else {
            Some(self.data[i as usize][j as usize])
        }
    }

    /// Live cells among the Moore neighbours of (row, col). Offsets that fall
    /// off the grid are clipped rather than wrapped, so a corner sees at most
    /// 3 candidates and an edge cell at most 5.
    pub fn neighbours(&self, row: usize, col: usize) -> usize {
        let (i, j) = (row as i32, col as i32);
        [
            self.get(i - 1, j - 1),
            self.get(i - 1, j + 1),
            self.get(i + 1, j - 1),
            self.get(i + 1, j + 1),

            self.get(i - 1, j),
            self.get(i + 1, j),
            self.get(i, j - 1),
            self.get(i, j + 1),
        ]
        .iter()
        .filter(|c| **c == Some(true))
        .count()
    }

    /// Next generation, computed entirely from `self` into a fresh buffer so
    /// that no cell's update can observe another cell's updated value.
    pub fn step(&self) -> Grid {
        let mut next: Vec<Vec<bool>> = Vec::with_capacity(self.size);

        for i in 0..self.size {
            let mut row = Vec::with_capacity(self.size);
            for j in 0..self.size {
                let cell = match Rule::decide(self.neighbours(i, j)) {
                    Rule::Kill => false,
                    Rule::BecomeAlive => true,
                    Rule::Keep => self.data[i][j],
                };
                row.push(cell);
            }
            next.push(row);
        }

        Grid {
            size: self.size,
            data: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|r| r.chars().map(|c| c == '#').collect())
                .collect(),
        )
    }

    #[test]
    fn decide_covers_every_count() {
        for n in 0..=8 {
            let expected = match n {
                0 | 1 => Rule::Kill,
                2 => Rule::Keep,
                3 => Rule::BecomeAlive,
                _ => Rule::Kill,
            };
            assert_eq!(Rule::decide(n), expected, "count {n}");
        }
    }

    #[test]
    fn neighbours_clip_at_the_border() {
        let g = grid(&[
            "####",
            "####",
            "####",
            "####",
        ]);
        assert_eq!(g.neighbours(0, 0), 3);
        assert_eq!(g.neighbours(0, 3), 3);
        assert_eq!(g.neighbours(3, 0), 3);
        assert_eq!(g.neighbours(3, 3), 3);
        assert_eq!(g.neighbours(0, 1), 5);
        assert_eq!(g.neighbours(2, 0), 5);
        assert_eq!(g.neighbours(1, 2), 8);
    }

    #[test]
    fn neighbours_exclude_the_center() {
        let mut rows = vec![vec![false; 4]; 4];
        rows[1][1] = true;
        let g = Grid::new(rows);
        assert_eq!(g.neighbours(1, 1), 0);
        assert_eq!(g.neighbours(0, 0), 1);
        assert_eq!(g.neighbours(2, 2), 1);
    }

    #[test]
    fn dead_grid_is_a_fixed_point() {
        let g = Grid::new(vec![vec![false; 6]; 6]);
        assert_eq!(g.step(), g);
    }

    #[test]
    fn lone_cell_dies() {
        let g = grid(&[
            "    ",
            " #  ",
            "    ",
            "    ",
        ]);
        assert_eq!(g.step(), Grid::new(vec![vec![false; 4]; 4]));
    }

    #[test]
    fn corner_trio_grows_into_a_block() {
        // (0,0) and (0,1) and (1,0) each see two live neighbours and keep
        // their state; (1,1) sees all three and becomes alive; every other
        // cell counts at most one and is killed.
        let g = grid(&[
            "##  ",
            "#   ",
            "    ",
            "    ",
        ]);
        let expected = grid(&[
            "##  ",
            "##  ",
            "    ",
            "    ",
        ]);
        assert_eq!(g.step(), expected);
    }

    #[test]
    fn step_reads_only_the_old_generation() {
        // A row of three: under this rule the middle keeps (2 neighbours),
        // the ends are killed (1 each), and the cells above and below the
        // middle are born (3 each). Any in-place update would skew the
        // counts for cells scanned later.
        let g = grid(&[
            "     ",
            "     ",
            " ### ",
            "     ",
            "     ",
        ]);
        let expected = grid(&[
            "     ",
            "  #  ",
            "  #  ",
            "  #  ",
            "     ",
        ]);
        assert_eq!(g.step(), expected);
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (4usize..10).prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n)
                .prop_map(Grid::new)
        })
    }

    proptest! {
        #[test]
        fn neighbour_counts_stay_in_range(g in arb_grid()) {
            let n = g.size();
            for i in 0..n {
                for j in 0..n {
                    prop_assert!(g.neighbours(i, j) <= 8);
                }
            }
        }

        #[test]
        fn corners_never_exceed_three(g in arb_grid()) {
            let last = g.size() - 1;
            for (i, j) in [(0, 0), (0, last), (last, 0), (last, last)] {
                prop_assert!(g.neighbours(i, j) <= 3);
            }
        }

        #[test]
        fn step_is_deterministic_and_leaves_its_input_alone(g in arb_grid()) {
            let snapshot = g.clone();
            let first = g.step();
            let second = g.step();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&g, &snapshot);
            prop_assert_eq!(first.size(), g.size());
        }
    }
}

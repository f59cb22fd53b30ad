// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use hssp_model::{point::PointSet, solution::Solution};
use std::io::{self, Write};

/// Formats like C's `%.15e`: the exponent carries a sign and at least two
/// digits.
pub fn scientific(value: f64) -> String {
    let formatted = format!("{value:.15e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Writes the hypervolume line and the membership line.
pub fn write_solution<W: Write>(out: &mut W, solution: &Solution, n: usize) -> io::Result<()> {
    writeln!(out, "{}", scientific(solution.hypervolume()))?;
    let membership = solution.membership(n);
    for (i, flag) in membership.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{flag}")?;
    }
    writeln!(out)
}

/// Writes the normalized coordinates, one point per line.
pub fn write_points<W: Write>(out: &mut W, points: &PointSet) -> io::Result<()> {
    for point in points {
        let line: Vec<String> = point.coordinates().iter().map(|c| c.to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hssp_model::index::PointId;

    #[test]
    fn test_scientific_matches_printf() {
        assert_eq!(scientific(9.0), "9.000000000000000e+00");
        assert_eq!(scientific(13.5), "1.350000000000000e+01");
        assert_eq!(scientific(0.00125), "1.250000000000000e-03");
        assert_eq!(scientific(1.0e123), "1.000000000000000e+123");
        assert_eq!(scientific(0.0), "0.000000000000000e+00");
    }

    #[test]
    fn test_write_solution() {
        let solution = Solution::new(9.0, vec![PointId::new(2)]);
        let mut out = Vec::new();
        write_solution(&mut out, &solution, 3).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "9.000000000000000e+00\n0 0 1\n");
    }

    #[test]
    fn test_write_points() {
        let points = PointSet::new(2, vec![vec![1.0, 5.5], vec![3.0, 0.25]]).unwrap();
        let mut out = Vec::new();
        write_points(&mut out, &points).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 5.5\n3 0.25\n");
    }
}

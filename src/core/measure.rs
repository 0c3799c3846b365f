//! Abstands- und Projektions-Hilfen für Punkte, Geraden und Ebenen.

use super::DISTANCE_EPSILON;
use glam::DVec3;

/// Projiziert `point` auf die unendliche Gerade durch `start` und `end`.
///
/// Bei degenerierter Geraden (Länge unter Epsilon) wird `start` zurückgegeben.
pub fn project_point_to_line(point: DVec3, start: DVec3, end: DVec3) -> DVec3 {
    let direction = end - start;
    let length_sq = direction.length_squared();
    if length_sq < DISTANCE_EPSILON * DISTANCE_EPSILON {
        return start;
    }
    let t = (point - start).dot(direction) / length_sq;
    start + direction * t
}

/// Abstand von `point` zur unendlichen Geraden durch `start` und `end`.
pub fn distance_point_to_line(point: DVec3, start: DVec3, end: DVec3) -> f64 {
    point.distance(project_point_to_line(point, start, end))
}

/// Projiziert `point` entlang `normal` auf die Ebene durch `origin`.
pub fn project_point_to_plane(point: DVec3, origin: DVec3, normal: DVec3) -> DVec3 {
    let normal = normal.normalize_or_zero();
    point - normal * (point - origin).dot(normal)
}

/// Minimaler Abstand zweier Strecken `p1-q1` und `p2-q2`.
///
/// Klassischer Closest-Point-Ansatz über die Parameter `s` und `t`,
/// beide auf `[0, 1]` geklemmt.
pub fn segment_distance(p1: DVec3, q1: DVec3, p2: DVec3, q2: DVec3) -> f64 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);
    let eps = DISTANCE_EPSILON * DISTANCE_EPSILON;

    let (s, t) = if a <= eps && e <= eps {
        (0.0, 0.0)
    } else if a <= eps {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= eps {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom > eps {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s).distance(p2 + d2 * t)
}

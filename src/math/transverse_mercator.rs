//! Universal Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! Uses the Krüger series to fourth order in the third flattening, which is
//! accurate to well under a millimetre within a zone. Coordinates are
//! longitude/latitude in degrees on the geographic side and easting/northing
//! in meters on the projected side.

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
/// UTM scale factor on the central meridian
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting (meters)
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for southern hemisphere zones (meters)
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Width of a UTM zone in degrees of longitude
const ZONE_WIDTH_DEG: f64 = 6.0;

/// Transverse Mercator parameters for a single UTM zone.
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    /// UTM zone number (1-60)
    pub zone: u8,
    /// Whether the zone uses the northern hemisphere false northing
    pub north: bool,
    /// Central meridian in radians
    lon0: f64,
    /// k0 * A, the scaled rectifying radius
    scaled_radius: f64,
    /// 2 * sqrt(n) / (1 + n), used for conformal latitude
    conformal_factor: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl TransverseMercator {
    /// Create the projection for a UTM zone.
    ///
    /// Zones outside 1..=60 are clamped into range.
    pub fn utm(zone: u8, north: bool) -> Self {
        let zone = zone.clamp(1, 60);
        let lon0 = (f64::from(zone) * ZONE_WIDTH_DEG - 183.0).to_radians();

        let f = 1.0 / WGS84_INVERSE_FLATTENING;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let rectifying_radius =
            WGS84_SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
            49561.0 * n4 / 161_280.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
            4397.0 * n4 / 161_280.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
            56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
            4279.0 * n4 / 630.0,
        ];

        Self {
            zone,
            north,
            lon0,
            scaled_radius: UTM_SCALE_FACTOR * rectifying_radius,
            conformal_factor: 2.0 * n.sqrt() / (1.0 + n),
            alpha,
            beta,
            delta,
        }
    }

    /// Central meridian of the zone in degrees
    pub fn central_meridian(&self) -> f64 {
        self.lon0.to_degrees()
    }

    const fn false_northing(&self) -> f64 {
        if self.north {
            0.0
        } else {
            UTM_FALSE_NORTHING_SOUTH
        }
    }

    /// Project longitude/latitude in degrees to easting/northing in meters.
    ///
    /// Non-finite output indicates an input outside the projection's domain
    /// (for example a latitude beyond the poles).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lon0;

        let c = self.conformal_factor;
        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - c * (c * sin_phi).atanh()).sinh();

        let xi_prime = t.atan2(dlon.cos());
        let eta_prime = (dlon.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let easting = UTM_FALSE_EASTING + self.scaled_radius * eta;
        let northing = self.false_northing() + self.scaled_radius * xi;
        (easting, northing)
    }

    /// Unproject easting/northing in meters to longitude/latitude in degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let xi = (northing - self.false_northing()) / self.scaled_radius;
        let eta = (easting - UTM_FALSE_EASTING) / self.scaled_radius;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_prime.sin() / eta_prime.cosh()).asin();
        let mut phi = chi;
        for (j, d) in self.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += d * (k * chi).sin();
        }

        let lon = self.lon0 + eta_prime.sinh().atan2(xi_prime.cos());
        (lon.to_degrees(), phi.to_degrees())
    }
}

/// UTM zone number containing a longitude in degrees.
///
/// Longitudes are wrapped into [-180, 180); the Norway and Svalbard
/// exceptions are not applied.
pub fn utm_zone(lon_deg: f64) -> u8 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0);
    let zone = (wrapped / ZONE_WIDTH_DEG).floor() + 1.0;
    zone.clamp(1.0, 60.0) as u8
}

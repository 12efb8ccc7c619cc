// src/mineral.rs - Fixed phase vocabulary and the static mineral database.
//
// Phase symbols follow the structural-model output convention (Mg endmembers
// stand in for their solid solutions); grid keys are the sanitized Stixrude
// database abbreviations used to address property-grid files.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mineral {
    HpClinoenstatite, // "C2/c"
    Periclase,        // "Wus"
    Perovskite,       // "Pv"
    Anorthite,        // "an"
    Forsterite,       // "O"
    Wadsleyite,       // "Wad"
    Ringwoodite,      // "Ring"
    Orthopyroxene,    // "Opx"
    Clinopyroxene,    // "Cpx"
    Akimotoite,       // "Aki"
    MajoriticGarnet,  // "Gt_maj"
    PostPerovskite,   // "Ppv"
    Clinoferrosilite, // "CF"
    Stishovite,       // "st"
    Quartz,           // "q"
    CaPerovskite,     // "ca-pv"
    HpClinoferrosilite, // "cfs"
    Coesite,          // "coe"
    Kyanite,          // "ky"
    Seifertite,       // "seif"
    Spinel,           // "Sp"
}

impl Mineral {
    pub const ALL: [Mineral; 21] = [
        Mineral::HpClinoenstatite,
        Mineral::Periclase,
        Mineral::Perovskite,
        Mineral::Anorthite,
        Mineral::Forsterite,
        Mineral::Wadsleyite,
        Mineral::Ringwoodite,
        Mineral::Orthopyroxene,
        Mineral::Clinopyroxene,
        Mineral::Akimotoite,
        Mineral::MajoriticGarnet,
        Mineral::PostPerovskite,
        Mineral::Clinoferrosilite,
        Mineral::Stishovite,
        Mineral::Quartz,
        Mineral::CaPerovskite,
        Mineral::HpClinoferrosilite,
        Mineral::Coesite,
        Mineral::Kyanite,
        Mineral::Seifertite,
        Mineral::Spinel,
    ];

    /// The phase symbol as it appears in composition inputs and profile
    /// column headers.
    pub fn symbol(&self) -> &'static str {
        match self {
            Mineral::HpClinoenstatite => "C2/c",
            Mineral::Periclase => "Wus",
            Mineral::Perovskite => "Pv",
            Mineral::Anorthite => "an",
            Mineral::Forsterite => "O",
            Mineral::Wadsleyite => "Wad",
            Mineral::Ringwoodite => "Ring",
            Mineral::Orthopyroxene => "Opx",
            Mineral::Clinopyroxene => "Cpx",
            Mineral::Akimotoite => "Aki",
            Mineral::MajoriticGarnet => "Gt_maj",
            Mineral::PostPerovskite => "Ppv",
            Mineral::Clinoferrosilite => "CF",
            Mineral::Stishovite => "st",
            Mineral::Quartz => "q",
            Mineral::CaPerovskite => "ca-pv",
            Mineral::HpClinoferrosilite => "cfs",
            Mineral::Coesite => "coe",
            Mineral::Kyanite => "ky",
            Mineral::Seifertite => "seif",
            Mineral::Spinel => "Sp",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        Mineral::ALL.iter().copied().find(|m| m.symbol() == s)
    }

    /// Sanitized Stixrude-style key used to address property-grid files.
    pub fn grid_key(&self) -> &'static str {
        match self {
            Mineral::HpClinoenstatite => "hpcEn",
            Mineral::Periclase => "Per",
            Mineral::Perovskite => "MgPrv",
            Mineral::Anorthite => "An",
            Mineral::Forsterite => "Fo",
            Mineral::Wadsleyite => "MgWds",
            Mineral::Ringwoodite => "MgRwd",
            Mineral::Orthopyroxene => "En",
            Mineral::Clinopyroxene => "cEn",
            Mineral::Akimotoite => "MgAki",
            Mineral::MajoriticGarnet => "Maj",
            Mineral::PostPerovskite => "MgPpv",
            Mineral::Clinoferrosilite => "MgCf",
            Mineral::Stishovite => "Sti",
            Mineral::Quartz => "Qz",
            Mineral::CaPerovskite => "CaPrv",
            Mineral::HpClinoferrosilite => "hpcFs",
            Mineral::Coesite => "Coe",
            Mineral::Kyanite => "Ky",
            Mineral::Seifertite => "Seif",
            Mineral::Spinel => "Spl",
        }
    }
}

/// Extended Berman (1988) heat-capacity polynomial, J/(mol·K):
/// Cp_mol = k0 + k1·T^-1/2 + k2·T^-2 + k3·T^-3 + k4·T^-1 + k5·T + k6·T².
/// Dividing by the molar weight converts to J/(kg·K).
#[derive(Debug, Clone, Copy)]
pub struct BermanCp {
    pub molar_weight_g: f64,
    pub k: [f64; 7],
}

impl BermanCp {
    /// Specific heat capacity at `temp_k`, in J/(kg·K).
    pub fn cp_j_kg_k(&self, temp_k: f64) -> f64 {
        let [k0, k1, k2, k3, k4, k5, k6] = self.k;
        let molcp = k0
            + k1 * temp_k.powf(-0.5)
            + k2 * temp_k.powi(-2)
            + k3 * temp_k.powi(-3)
            + k4 * temp_k.powi(-1)
            + k5 * temp_k
            + k6 * temp_k.powi(2);
        (1000.0 / self.molar_weight_g) * molcp
    }
}

/// Linear-in-temperature expansivity fit used to generate the embedded
/// property grids: alpha(T) = a0 + a1·(T − 300), in 1/K at zero pressure.
#[derive(Debug, Clone, Copy)]
pub struct ExpansivityFit {
    pub a0: f64,
    pub a1: f64,
}

impl ExpansivityFit {
    pub fn alpha_per_k(&self, temp_k: f64) -> f64 {
        self.a0 + self.a1 * (temp_k - 300.0)
    }
}

#[derive(Debug, Clone)]
pub struct MineralProfile {
    pub mineral: Mineral,
    pub name: &'static str,
    pub conductivity_w_m_k: f64,
    /// Viscous activation energy, J/mol; phases without a measured value
    /// fall back to the olivine default when mixed.
    pub activation_energy_j_mol: Option<f64>,
    pub berman_cp: Option<BermanCp>,
    pub expansivity: Option<ExpansivityFit>,
}

pub static MINERAL_DB: Lazy<HashMap<Mineral, MineralProfile>> = Lazy::new(|| {
    use Mineral::*;
    let mut m = HashMap::new();

    m.insert(HpClinoenstatite, MineralProfile {
        mineral: HpClinoenstatite,
        name: "HP Clinoenstatite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: Some(BermanCp {
            molar_weight_g: 200.78,
            k: [139.95824, -497.034, -4400237.0, 535708928.0, 0.0, 0.0, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 2.3e-5, a1: 7.0e-9 }),
    });

    m.insert(Periclase, MineralProfile {
        mineral: Periclase,
        name: "Periclase",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: Some(BermanCp {
            molar_weight_g: 40.3,
            k: [61.10965, -296.199, -621154.0, 5844612.0, 0.0, 0.0, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 3.1e-5, a1: 5.0e-9 }),
    });

    m.insert(Perovskite, MineralProfile {
        mineral: Perovskite,
        name: "Mg-Perovskite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Anorthite, MineralProfile {
        mineral: Anorthite,
        name: "Anorthite",
        conductivity_w_m_k: 1.71544,
        activation_energy_j_mol: Some(648.0e3),
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Forsterite, MineralProfile {
        mineral: Forsterite,
        name: "Forsterite",
        conductivity_w_m_k: 5.10448,
        activation_energy_j_mol: Some(261.0e3),
        berman_cp: Some(BermanCp {
            molar_weight_g: 140.69,
            k: [233.18030, -1801.580, 0.0, -267937600.0, 0.0, 0.0, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 2.6e-5, a1: 6.0e-9 }),
    });

    m.insert(Wadsleyite, MineralProfile {
        mineral: Wadsleyite,
        name: "Mg-Wadsleyite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: Some(261.0e3),
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Ringwoodite, MineralProfile {
        mineral: Ringwoodite,
        name: "Ringwoodite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: Some(261.0e3),
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Orthopyroxene, MineralProfile {
        mineral: Orthopyroxene,
        name: "Orthopyroxene/En",
        conductivity_w_m_k: 4.3932,
        activation_energy_j_mol: Some(420.0e3),
        berman_cp: Some(BermanCp {
            molar_weight_g: 200.78,
            k: [1332.636, -9604.704, -18164480.0, 2233202400.0, 0.0, 0.0, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 2.4e-5, a1: 7.0e-9 }),
    });

    m.insert(Clinopyroxene, MineralProfile {
        mineral: Clinopyroxene,
        name: "Clinopyroxene/cEn",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: Some(560.0e3),
        berman_cp: Some(BermanCp {
            molar_weight_g: 216.55,
            k: [305.41333, -1604.931, -7165973.0, 921837568.0, 0.0, 0.0, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 2.5e-5, a1: 6.0e-9 }),
    });

    m.insert(Akimotoite, MineralProfile {
        mineral: Akimotoite,
        name: "Akimotoite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(MajoriticGarnet, MineralProfile {
        mineral: MajoriticGarnet,
        name: "Majoritic Garnet",
        conductivity_w_m_k: 3.175656,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(PostPerovskite, MineralProfile {
        mineral: PostPerovskite,
        name: "Post-perovskite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Clinoferrosilite, MineralProfile {
        mineral: Clinoferrosilite,
        name: "Mg-Clinoferrosilite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Stishovite, MineralProfile {
        mineral: Stishovite,
        name: "Stishovite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Quartz, MineralProfile {
        mineral: Quartz,
        name: "Quartz",
        conductivity_w_m_k: 7.686008,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(CaPerovskite, MineralProfile {
        mineral: CaPerovskite,
        name: "Ca-perovskite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: Some(BermanCp {
            molar_weight_g: 218.12,
            k: [310.69775, -1671.627, -7455263.0, 948781568.0, 0.0, 0.006272, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 2.2e-5, a1: 5.0e-9 }),
    });

    m.insert(HpClinoferrosilite, MineralProfile {
        mineral: HpClinoferrosilite,
        name: "hpcFs",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Coesite, MineralProfile {
        mineral: Coesite,
        name: "Coesite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Kyanite, MineralProfile {
        mineral: Kyanite,
        name: "Kyanite",
        conductivity_w_m_k: 14.154472,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Seifertite, MineralProfile {
        mineral: Seifertite,
        name: "Seifertite",
        conductivity_w_m_k: 5.0,
        activation_energy_j_mol: None,
        berman_cp: None,
        expansivity: None,
    });

    m.insert(Spinel, MineralProfile {
        mineral: Spinel,
        name: "Spinel",
        conductivity_w_m_k: 9.47676,
        activation_energy_j_mol: None,
        berman_cp: Some(BermanCp {
            molar_weight_g: 142.27,
            k: [235.9, -1766.6, -1710400.0, 40620000.0, 0.0, 0.0, 0.0],
        }),
        expansivity: Some(ExpansivityFit { a0: 2.0e-5, a1: 6.0e-9 }),
    });

    m
});

pub fn get_profile(mineral: Mineral) -> &'static MineralProfile {
    MINERAL_DB
        .get(&mineral)
        .expect("mineral database covers every Mineral variant")
}

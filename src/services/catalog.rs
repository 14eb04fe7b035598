use once_cell::sync::Lazy;

use crate::models::{Brand, DecompositionEntry, FiberType, Grade, Material, MaterialCategory};

/// Fabric dictionary fixtures. Read-only, loaded once, no lifecycle beyond
/// process start.
pub static MATERIALS: Lazy<Vec<Material>> = Lazy::new(|| {
    vec![
        Material {
            id: "m1",
            name: "Organic Cotton",
            category: MaterialCategory::Natural,
            sustainability_rating: Grade::A,
            description: "Cotton grown without toxic chemicals or GMOs. Uses significantly less water than conventional cotton.",
            pros: &["Biodegradable", "Breathable", "Soft", "Hypoallergenic"],
            cons: &["Can be water-intensive if not rain-fed", "Wrinkles easily"],
            care_instructions: &["Machine wash warm (40°C) or cold", "Tumble dry low or line dry", "Warm iron if needed"],
            eco_impact: "Low environmental impact when certified (GOTS).",
        },
        Material {
            id: "m2",
            name: "Linen (Flax)",
            category: MaterialCategory::Natural,
            sustainability_rating: Grade::A,
            description: "Made from the flax plant. Very strong, absorbent, and dries faster than cotton.",
            pros: &["Requires minimal water/pesticides", "Biodegradable", "Durable", "Cooling"],
            cons: &["Wrinkles very easily", "Can feel stiff initially"],
            care_instructions: &["Machine wash gentle", "Line dry preferred to prevent shrinkage", "Iron while damp for crispness"],
            eco_impact: "Excellent. Flax improves soil quality and requires no irrigation.",
        },
        Material {
            id: "m3",
            name: "Hemp",
            category: MaterialCategory::Natural,
            sustainability_rating: Grade::A,
            description: "One of the most eco-friendly fibers. Grows quickly, requires no pesticides, and returns nutrients to the soil.",
            pros: &["Extremely durable", "UV resistant", "Antimicrobial", "Carbon negative"],
            cons: &["Can be rough until broken in", "More expensive processing"],
            care_instructions: &["Machine wash cold/gentle", "Line dry out of direct sun", "Becomes softer with every wash"],
            eco_impact: "Superior. High yield per acre and soil regenerating.",
        },
        Material {
            id: "m4",
            name: "Wool",
            category: MaterialCategory::Natural,
            sustainability_rating: Grade::B,
            description: "Animal fiber usually from sheep. Excellent insulator and naturally moisture-wicking.",
            pros: &["Biodegradable", "Insulating", "Wrinkle-resistant", "Odor-resistant"],
            cons: &["Animal welfare concerns", "Can be itchy", "Methane emissions from sheep"],
            care_instructions: &["Hand wash cold or dry clean", "Lay flat to dry", "Do not wring or hang to avoid stretching"],
            eco_impact: "Moderate. Land use and methane are concerns, but it is renewable and long-lasting.",
        },
        Material {
            id: "m5",
            name: "Silk",
            category: MaterialCategory::Natural,
            sustainability_rating: Grade::B,
            description: "Protein fiber produced by silkworms. Luxurious, soft, and strong.",
            pros: &["Biodegradable", "Temperature regulating", "Luxurious feel"],
            cons: &["Ethical concerns (silkworms killed)", "Delicate care required"],
            care_instructions: &["Hand wash cold with pH neutral detergent", "Air dry in shade", "Cool iron or steam only"],
            eco_impact: "Moderate. Energy intensive processing. Peace silk is a better alternative.",
        },
        Material {
            id: "m6",
            name: "Tencel (Lyocell)",
            category: MaterialCategory::SemiSynthetic,
            sustainability_rating: Grade::B,
            description: "Cellulose fiber made from wood pulp (usually eucalyptus) in a closed-loop system.",
            pros: &["Closed-loop production", "Soft", "Drapes well", "Biodegradable"],
            cons: &["Energy intensive manufacturing", "Chemical processing (though recovered)"],
            care_instructions: &["Machine wash cold/gentle", "Line dry preferred", "Cool iron if needed"],
            eco_impact: "Good. Solvents are recycled, but relies on forestry.",
        },
        Material {
            id: "m7",
            name: "Rayon (Viscose)",
            category: MaterialCategory::SemiSynthetic,
            sustainability_rating: Grade::D,
            description: "Cellulose fiber from wood pulp. Often involves heavy chemical use and deforestation.",
            pros: &["Cheap", "Silk-like feel", "Drapes well"],
            cons: &["Toxic chemicals (CS2)", "Deforestation links", "Weak when wet"],
            care_instructions: &["Hand wash cold usually required", "Lay flat to dry", "Iron inside out on low heat"],
            eco_impact: "Poor. Unless certified (e.g., EcoVero), often harmful to workers and environment.",
        },
        Material {
            id: "m23",
            name: "Modal",
            category: MaterialCategory::SemiSynthetic,
            sustainability_rating: Grade::C,
            description: "A type of rayon made specifically from beech tree pulp. Softer and more durable than viscose.",
            pros: &["Very soft", "Resists shrinking", "Breathable"],
            cons: &["Chemical processing", "Can stretch out"],
            care_instructions: &["Machine wash gentle cycle", "Tumble dry low or line dry", "Low heat iron"],
            eco_impact: "Moderate. Better if it uses closed-loop (e.g. Tencel Modal), otherwise similar to viscose.",
        },
        Material {
            id: "m8",
            name: "Polyester",
            category: MaterialCategory::Synthetic,
            sustainability_rating: Grade::F,
            description: "Plastic fiber made from petroleum. The most common fabric in the world.",
            pros: &["Cheap", "Durable", "Wrinkle-free", "Quick-drying"],
            cons: &["Non-biodegradable", "Microplastic pollution", "Not breathable", "Relies on fossil fuels"],
            care_instructions: &["Machine wash warm/cool", "Tumble dry low", "Use Guppyfriend bag to catch microplastics"],
            eco_impact: "Very Poor. Major source of microplastics and carbon emissions.",
        },
        Material {
            id: "m9",
            name: "Recycled Polyester (rPET)",
            category: MaterialCategory::Synthetic,
            sustainability_rating: Grade::C,
            description: "Polyester made from recycled plastic bottles.",
            pros: &["Diverts waste from landfills", "Lower energy than virgin poly"],
            cons: &["Still sheds microplastics", "Not infinitely recyclable", "Can contain toxins"],
            care_instructions: &["Machine wash cool", "Air dry preferred", "Wash in filtration bag (e.g. Guppyfriend)"],
            eco_impact: "Better than virgin, but still problematic due to microplastics.",
        },
        Material {
            id: "m11",
            name: "Nylon",
            category: MaterialCategory::Synthetic,
            sustainability_rating: Grade::F,
            description: "Synthetic plastic fiber known for its strength and elasticity.",
            pros: &["Very durable", "Elastic", "Water-resistant"],
            cons: &["Non-biodegradable", "Sheds microplastics", "Energy intensive", "Nitrous oxide emissions"],
            care_instructions: &["Machine wash cold", "Line dry", "Wash infrequently"],
            eco_impact: "Very Poor. Production releases nitrous oxide, a potent greenhouse gas.",
        },
        Material {
            id: "m12",
            name: "Elastane (Lycra)",
            category: MaterialCategory::Synthetic,
            sustainability_rating: Grade::F,
            description: "Polyether-polyurea copolymer known for its exceptional elasticity. Also known as Spandex.",
            pros: &["Stretchy", "Comfortable", "Shape retention"],
            cons: &["Non-biodegradable", "Hard to recycle blends", "Microplastics"],
            care_instructions: &["Wash cold to maintain elasticity", "Do not use fabric softener", "Air dry - heat damages elasticity"],
            eco_impact: "Poor. Makes recycling other fabrics difficult when blended.",
        },
    ]
});

/// Curated sustainable-brand directory fixtures.
pub static BRANDS: Lazy<Vec<Brand>> = Lazy::new(|| {
    vec![
        Brand {
            id: "1",
            name: "Rawganique",
            description: "Chemical-free organic cotton, linen, and hemp clothing made in USA & Europe.",
            price_range: "$$",
            categories: &["Men", "Women", "Home"],
            primary_fabrics: &["Hemp", "Linen", "Organic Cotton"],
            location: "USA / Canada",
            shipping: "Worldwide",
            website_url: "https://rawganique.com",
        },
        Brand {
            id: "2",
            name: "Mate the Label",
            description: "Clean essentials made with organic cotton and non-toxic dyes.",
            price_range: "$$",
            categories: &["Women", "Activewear"],
            primary_fabrics: &["Organic Cotton", "Tencel"],
            location: "Los Angeles, USA",
            shipping: "International",
            website_url: "https://matethelabel.com",
        },
        Brand {
            id: "3",
            name: "Harvest & Mill",
            description: "100% USA grown, spun, and sewn organic cotton clothing.",
            price_range: "$$",
            categories: &["Unisex", "Basics"],
            primary_fabrics: &["Organic Cotton"],
            location: "USA",
            shipping: "USA",
            website_url: "https://harvestandmill.com",
        },
        Brand {
            id: "5",
            name: "Pact",
            description: "Affordable organic cotton basics produced in Fair Trade factories.",
            price_range: "$",
            categories: &["Men", "Women", "Kids"],
            primary_fabrics: &["Organic Cotton"],
            location: "USA",
            shipping: "USA",
            website_url: "https://wearpact.com",
        },
        Brand {
            id: "6",
            name: "Eileen Fisher",
            description: "Timeless designs focused on circularity and organic fibers.",
            price_range: "$$$$",
            categories: &["Women"],
            primary_fabrics: &["Linen", "Organic Cotton", "Wool", "Silk"],
            location: "USA",
            shipping: "International",
            website_url: "https://eileenfisher.com",
        },
        Brand {
            id: "7",
            name: "Kotn",
            description: "Ethically made Egyptian cotton staples supporting farming communities.",
            price_range: "$$",
            categories: &["Men", "Women", "Home"],
            primary_fabrics: &["Egyptian Cotton", "Linen"],
            location: "Canada",
            shipping: "International",
            website_url: "https://kotn.com",
        },
        Brand {
            id: "8",
            name: "Beaumont Organic",
            description: "Contemporary conscious clothing from the home of Manchester cotton.",
            price_range: "$$$",
            categories: &["Women"],
            primary_fabrics: &["Organic Cotton", "Linen"],
            location: "UK",
            shipping: "Worldwide",
            website_url: "https://beaumontorganic.com",
        },
    ]
});

/// "How long does clothing take to decompose?" timeline.
pub static DECOMPOSITION: Lazy<Vec<DecompositionEntry>> = Lazy::new(|| {
    vec![
        DecompositionEntry {
            fabric: "Linen",
            duration: "2 weeks - 6 months",
            fiber_type: FiberType::Natural,
            details: "One of the fastest to return to earth.",
        },
        DecompositionEntry {
            fabric: "Cotton",
            duration: "1 - 5 Months",
            fiber_type: FiberType::Natural,
            details: "Breaks down quickly if 100% organic and undyed.",
        },
        DecompositionEntry {
            fabric: "Wool",
            duration: "1 - 5 Years",
            fiber_type: FiberType::Natural,
            details: "Rich in nitrogen; can actually act as fertilizer.",
        },
        DecompositionEntry {
            fabric: "Leather",
            duration: "25 - 50 Years",
            fiber_type: FiberType::Hybrid,
            details: "Animal-based but tanning chemicals significantly slow decomposition.",
        },
        DecompositionEntry {
            fabric: "Nylon",
            duration: "30 - 40 Years",
            fiber_type: FiberType::Synthetic,
            details: "A plastic derivative that lingers for decades.",
        },
        DecompositionEntry {
            fabric: "Polyester",
            duration: "200+ Years",
            fiber_type: FiberType::Synthetic,
            details: "Will outlive the person who wore it.",
        },
        DecompositionEntry {
            fabric: "Spandex",
            duration: "500+ Years",
            fiber_type: FiberType::Synthetic,
            details: "Practically permanent in our environment.",
        },
    ]
});

/// Dictionary filter: optional category plus case-insensitive name search.
pub fn filter_materials(category: Option<MaterialCategory>, query: &str) -> Vec<&'static Material> {
    let query = query.to_lowercase();
    MATERIALS
        .iter()
        .filter(|m| category.map_or(true, |c| m.category == c))
        .filter(|m| m.name.to_lowercase().contains(&query))
        .collect()
}

/// Directory filter: price and location narrow exactly like the original UI,
/// search matches brand name or any primary fabric.
pub fn filter_brands(price: Option<&str>, location: Option<&str>, query: &str) -> Vec<&'static Brand> {
    let query = query.to_lowercase();
    BRANDS
        .iter()
        .filter(|b| price.map_or(true, |p| b.price_range == p))
        .filter(|b| location.map_or(true, |l| b.location.contains(l)))
        .filter(|b| {
            b.name.to_lowercase().contains(&query)
                || b.primary_fabrics
                    .iter()
                    .any(|f| f.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn decomposition_timeline() -> &'static [DecompositionEntry] {
    &DECOMPOSITION
}

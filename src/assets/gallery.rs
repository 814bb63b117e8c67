use crate::assets::data_url::ImageRef;

/// A predefined design offered in the editor's gallery tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalleryDesign {
    pub path: &'static str,
    pub label: &'static str,
}

impl GalleryDesign {
    pub fn image_ref(self) -> ImageRef {
        ImageRef::Gallery(self.path.to_owned())
    }
}

/// Gallery contents in display order.
pub const PREDEFINED_DESIGNS: [GalleryDesign; 6] = [
    GalleryDesign {
        path: "/cool-skull-design.jpg",
        label: "Calavera",
    },
    GalleryDesign {
        path: "/abstract-geometric-pattern.png",
        label: "Geométrico",
    },
    GalleryDesign {
        path: "/vintage-logo.jpg",
        label: "Logo vintage",
    },
    GalleryDesign {
        path: "/nature-leaf-design.jpg",
        label: "Hoja",
    },
    GalleryDesign {
        path: "/abstract-composition.png",
        label: "Abstracto",
    },
    GalleryDesign {
        path: "/music-notes.jpg",
        label: "Notas musicales",
    },
];

/// Look up a gallery design by its 0-based position.
pub fn gallery_design(index: usize) -> Option<GalleryDesign> {
    PREDEFINED_DESIGNS.get(index).copied()
}

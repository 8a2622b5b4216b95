pub mod hists;

mod axes_draw;
